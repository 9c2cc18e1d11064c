mod traits;

pub mod hmac;
pub mod none;

#[cfg(feature = "rsa")]
pub mod rsa;

pub use traits::{Signer, Verifier};

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Algorithm identifier from the JWT `alg` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// HMAC with SHA-256
    HS256,

    /// HMAC with SHA-384
    HS384,

    /// HMAC with SHA-512
    HS512,

    /// RSASSA-PKCS1-v1_5 with SHA-256
    RS256,

    /// RSASSA-PKCS1-v1_5 with SHA-384
    RS384,

    /// RSASSA-PKCS1-v1_5 with SHA-512
    RS512,

    /// Unsecured JWS (`alg: "none"`)
    ///
    /// Only usable through [`none::NoneSigner`] / [`none::NoneVerifier`]
    /// together with [`AlgorithmPolicy::allow_none`].
    None,
}

/// Algorithm family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    Hmac,
    Rsa,
    None,
}

/// Key material an algorithm expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Shared secret bytes
    SharedSecret,
    /// RSA private key for signing, public key for verifying
    RsaKeyPair,
    /// No key
    None,
}

impl Algorithm {
    /// Every registered algorithm, `none` last
    pub const ALL: [Algorithm; 7] = [
        Algorithm::HS256,
        Algorithm::HS384,
        Algorithm::HS512,
        Algorithm::RS256,
        Algorithm::RS384,
        Algorithm::RS512,
        Algorithm::None,
    ];

    /// The `alg` header value
    pub const fn as_str(self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            Algorithm::RS256 => "RS256",
            Algorithm::RS384 => "RS384",
            Algorithm::RS512 => "RS512",
            Algorithm::None => "none",
        }
    }

    pub const fn family(self) -> AlgorithmFamily {
        match self {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => AlgorithmFamily::Hmac,
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => AlgorithmFamily::Rsa,
            Algorithm::None => AlgorithmFamily::None,
        }
    }

    /// Digest size in bits, `None` for the unsecured algorithm
    pub const fn hash_bits(self) -> Option<u16> {
        match self {
            Algorithm::HS256 | Algorithm::RS256 => Some(256),
            Algorithm::HS384 | Algorithm::RS384 => Some(384),
            Algorithm::HS512 | Algorithm::RS512 => Some(512),
            Algorithm::None => None,
        }
    }

    /// Name of the underlying primitive, in the JCA naming scheme
    pub const fn primitive_name(self) -> &'static str {
        match self {
            Algorithm::HS256 => "HmacSHA256",
            Algorithm::HS384 => "HmacSHA384",
            Algorithm::HS512 => "HmacSHA512",
            Algorithm::RS256 => "SHA256withRSA",
            Algorithm::RS384 => "SHA384withRSA",
            Algorithm::RS512 => "SHA512withRSA",
            Algorithm::None => "none",
        }
    }

    pub const fn key_kind(self) -> KeyKind {
        match self.family() {
            AlgorithmFamily::Hmac => KeyKind::SharedSecret,
            AlgorithmFamily::Rsa => KeyKind::RsaKeyPair,
            AlgorithmFamily::None => KeyKind::None,
        }
    }

    /// Check that this algorithm belongs to `family`
    pub(crate) fn expect_family(self, family: AlgorithmFamily) -> Result<()> {
        if self.family() == family {
            Ok(())
        } else {
            Err(Error::UnsupportedAlgorithm(format!(
                "{} is not a {} algorithm",
                self, family
            )))
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Case-sensitive lookup of an `alg` value
    fn from_str(s: &str) -> Result<Self> {
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| Error::UnsupportedAlgorithm(s.to_string()))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AlgorithmFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AlgorithmFamily::Hmac => "HMAC",
            AlgorithmFamily::Rsa => "RSA",
            AlgorithmFamily::None => "none",
        })
    }
}

impl Serialize for Algorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Algorithm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Policy for allowed algorithms
///
/// The default allows every signing algorithm but never `none`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmPolicy {
    allowed: Vec<Algorithm>,
}

impl AlgorithmPolicy {
    /// Create a policy that allows only specific algorithms
    pub fn allow_only(algorithms: impl IntoIterator<Item = Algorithm>) -> Self {
        let mut allowed = Vec::new();
        for alg in algorithms {
            if !allowed.contains(&alg) {
                allowed.push(alg);
            }
        }
        Self { allowed }
    }

    /// Every HMAC and RSA algorithm; `none` stays excluded
    pub fn allow_all() -> Self {
        Self::allow_only(
            Algorithm::ALL
                .into_iter()
                .filter(|alg| *alg != Algorithm::None),
        )
    }

    /// Policy that allows only HS256
    pub fn hs256_only() -> Self {
        Self::allow_only([Algorithm::HS256])
    }

    /// Policy that allows only HS384
    pub fn hs384_only() -> Self {
        Self::allow_only([Algorithm::HS384])
    }

    /// Policy that allows only HS512
    pub fn hs512_only() -> Self {
        Self::allow_only([Algorithm::HS512])
    }

    /// Policy that allows any HMAC algorithm (HS256, HS384, HS512)
    ///
    /// # Security Warning
    ///
    /// Using multiple HMAC variants with the same key is not recommended.
    /// Prefer algorithm-specific policies like [`hs256_only()`](Self::hs256_only).
    pub fn hmac_any() -> Self {
        Self::allow_only([Algorithm::HS256, Algorithm::HS384, Algorithm::HS512])
    }

    /// Policy that allows only RS256
    pub fn rs256_only() -> Self {
        Self::allow_only([Algorithm::RS256])
    }

    /// Policy that allows only RS384
    pub fn rs384_only() -> Self {
        Self::allow_only([Algorithm::RS384])
    }

    /// Policy that allows only RS512
    pub fn rs512_only() -> Self {
        Self::allow_only([Algorithm::RS512])
    }

    /// Policy that allows any RSA algorithm (RS256, RS384, RS512)
    pub fn rsa_any() -> Self {
        Self::allow_only([Algorithm::RS256, Algorithm::RS384, Algorithm::RS512])
    }

    /// Additionally allow unsecured (`alg: "none"`) tokens
    ///
    /// # Security Warning
    ///
    /// Unsecured tokens carry no integrity protection at all.
    pub fn allow_none(mut self) -> Self {
        if !self.allowed.contains(&Algorithm::None) {
            self.allowed.push(Algorithm::None);
        }
        self
    }

    /// Check if an algorithm is allowed
    pub fn is_allowed(&self, algorithm: Algorithm) -> bool {
        self.allowed.contains(&algorithm)
    }

    /// Validate algorithm against policy
    pub fn validate(&self, algorithm: Algorithm) -> Result<()> {
        if self.is_allowed(algorithm) {
            Ok(())
        } else {
            Err(self.rejection(algorithm.as_str()))
        }
    }

    /// Get list of allowed algorithms
    pub fn allowed_algorithms(&self) -> &[Algorithm] {
        &self.allowed
    }

    pub(crate) fn rejection(&self, found: &str) -> Error {
        Error::DisallowedAlgorithm {
            found: found.to_string(),
            allowed: self.allowed.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl Default for AlgorithmPolicy {
    fn default() -> Self {
        Self::allow_all()
    }
}
