//! # jwtforge - JWT Signing and Verification
//!
//! > HMAC and RSA signed JSON Web Tokens in compact serialization, with claim validation.
//!
//! **jwtforge** produces and consumes compact JWS tokens
//! (`base64url(header).base64url(claims).base64url(signature)`) for the HS256/384/512 and
//! RS256/384/512 algorithms. The caller always picks the verifier, and the decoder refuses any
//! token whose header names a different algorithm.
//!
//! ## Quick Start
//!
//! ```
//! use jwtforge::*;
//!
//! let signer = HmacSigner::sha256("your-256-bit-secret")?;
//! let claims = Claims::new()
//!     .with_issuer("https://auth.example.com")
//!     .with_subject("user-42")
//!     .with_expiration(NumericDate::from_seconds(4_102_444_800));
//! let token = Encoder::new(&signer).encode(&claims)?;
//!
//! let decoder = Decoder::new(
//!     ValidationPolicy::new()
//!         .algorithms(AlgorithmPolicy::hs256_only())
//!         .issuer("https://auth.example.com")
//!         .clock_skew(30),
//! );
//! let verified = decoder.decode(&token, &HmacVerifier::sha256("your-256-bit-secret")?)?;
//! assert_eq!(verified.subject(), Some("user-42"));
//! # Ok::<(), jwtforge::Error>(())
//! ```
//!
//! ## Decoding Flow
//!
//! ```text
//! token string
//!     │ split, 64 KiB bound
//!     ▼
//! Header (alg registered? allowed by policy? equal to verifier's?)
//!     │ Verifier::verify(header.claims, signature)
//!     ▼
//! Claims (registered claims type-checked)
//!     │ ValidationPolicy::validate_claims (exp, nbf, iat, max_age, iss, aud)
//!     ▼
//! Claims / Jwt
//! ```
//!
//! ## Algorithm Support
//!
//! | `alg`   | Signer / Verifier                 | Key                                   |
//! |---------|-----------------------------------|---------------------------------------|
//! | `HS256` | `HmacSigner` / `HmacVerifier`     | shared secret                         |
//! | `HS384` | `HmacSigner` / `HmacVerifier`     | shared secret                         |
//! | `HS512` | `HmacSigner` / `HmacVerifier`     | shared secret                         |
//! | `RS256` | `RsaSigner` / `RsaVerifier`       | RSA PEM, at least 2048 bits           |
//! | `RS384` | `RsaSigner` / `RsaVerifier`       | RSA PEM, at least 2048 bits           |
//! | `RS512` | `RsaSigner` / `RsaVerifier`       | RSA PEM, at least 2048 bits           |
//! | `none`  | `NoneSigner` / `NoneVerifier`     | none; also needs `allow_none()`       |
//!
//! RSA keys are read from PEM: `RSA PRIVATE KEY` (PKCS#1), `PRIVATE KEY` (PKCS#8),
//! `PUBLIC KEY` (SPKI) and `RSA PUBLIC KEY` (PKCS#1). Text before the `-----BEGIN` line is
//! ignored. Moduli from 2048 up to 16384 bits are accepted by default (`RsaKeyPolicy`).
//!
//! ## Features
//!
//! - **HMAC** (always enabled): HS256, HS384, HS512
//! - **`rsa`** (default): RSA algorithms (RS256, RS384, RS512) and PEM key loading
//!
//! ## Security
//!
//! ### Algorithm Confusion Prevention
//!
//! The verifier is chosen by the caller, never by the token. A token declaring `HS256` presented
//! to an `RsaVerifier` fails with `AlgorithmMismatch` before any cryptography runs, so an RSA
//! public key can never be used as an HMAC secret.
//!
//! ### RSA Signing Side Channels
//!
//! `RsaSigner` is deterministic and unblinded. Its private-key operation is not hardened
//! against timing measurement; see the `# Security` section on `RsaSigner`.
//!
//! ### "none" Algorithm
//!
//! `AlgorithmPolicy::allow_all()` never includes `none`. Unsigned tokens are accepted only with an
//! explicit `NoneVerifier` *and* a policy built with `allow_none()`.
//!
//! ### Timing Attack Protection
//!
//! HMAC signature verification uses constant-time comparison via the [`constant_time_eq`](https://crates.io/crates/constant_time_eq)
//! crate.
//!
//! ### Secrets
//!
//! HMAC secrets and decoded PEM bodies are zeroed on drop, print as `[REDACTED]`, and never
//! appear in error messages or logs.
//!
//! ## References
//!
//! - [RFC 7515](https://datatracker.ietf.org/doc/html/rfc7515): JSON Web Signature (JWS)
//! - [RFC 7519](https://datatracker.ietf.org/doc/html/rfc7519): JSON Web Token (JWT)
//! - [RFC 7468](https://datatracker.ietf.org/doc/html/rfc7468): Textual Encodings of PKIX Structures
//! - [RFC 8725](https://datatracker.ietf.org/doc/html/rfc8725): JSON Web Token Best Current Practices

// Core modules
pub mod error;
pub mod utils;

// Algorithm system
pub mod algorithm;
pub mod keys;

// Claims and validation
pub mod claims;

// Compact serialization
pub mod token;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use algorithm::hmac::{HmacSigner, HmacVerifier};
pub use algorithm::none::{NoneSigner, NoneVerifier};
#[cfg(feature = "rsa")]
pub use algorithm::rsa::{RsaSigner, RsaVerifier};
pub use algorithm::{Algorithm, AlgorithmFamily, AlgorithmPolicy, KeyKind, Signer, Verifier};

pub use claims::{
    Audience, Claims, Clock, FixedClock, NumericDate, SystemClock, ValidationPolicy,
};
pub use error::{Error, ErrorKind, Result};
pub use keys::{HmacSecret, PemBlock, PemLabel, RsaKeyPolicy};
pub use token::{Decoder, Encoder, Header, Jwt};
