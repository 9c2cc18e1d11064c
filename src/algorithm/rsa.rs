use super::{Algorithm, AlgorithmFamily, Signer, Verifier};
use crate::error::{Error, Result};
use crate::keys::rsa::{check_modulus, modulus_bits, parse_private_key, parse_public_key};
use crate::keys::RsaKeyPolicy;

use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::fmt;
use tracing::debug;

/// RSASSA-PKCS1-v1_5 signer (RS256, RS384, RS512)
///
/// # Security
///
/// Signing runs the private-key operation without blinding and draws no
/// randomness, so its timing is not hardened against side-channel
/// measurement (see RUSTSEC-2023-0071 for the `rsa` crate). Do not sign
/// attacker-chosen input where signing time can be observed remotely with
/// high precision. Verification only uses the public key and is unaffected.
#[derive(Clone)]
pub struct RsaSigner {
    algorithm: Algorithm,
    key: RsaPrivateKey,
}

impl RsaSigner {
    /// Load a PKCS#1 or PKCS#8 private key PEM with the default key policy
    pub fn new(algorithm: Algorithm, pem: &str) -> Result<Self> {
        Self::with_policy(algorithm, pem, &RsaKeyPolicy::default())
    }

    pub fn with_policy(algorithm: Algorithm, pem: &str, policy: &RsaKeyPolicy) -> Result<Self> {
        algorithm.expect_family(AlgorithmFamily::Rsa)?;
        let key = parse_private_key(pem, policy)?;
        Ok(Self { algorithm, key })
    }

    /// Wrap an already decoded key
    pub fn from_key(algorithm: Algorithm, key: RsaPrivateKey, policy: &RsaKeyPolicy) -> Result<Self> {
        algorithm.expect_family(AlgorithmFamily::Rsa)?;
        check_modulus(&key, policy)?;
        Ok(Self { algorithm, key })
    }

    pub fn sha256(pem: &str) -> Result<Self> {
        Self::new(Algorithm::RS256, pem)
    }

    pub fn sha384(pem: &str) -> Result<Self> {
        Self::new(Algorithm::RS384, pem)
    }

    pub fn sha512(pem: &str) -> Result<Self> {
        Self::new(Algorithm::RS512, pem)
    }

    pub fn modulus_bits(&self) -> usize {
        modulus_bits(&self.key)
    }

    /// Verifier for the public half of this key
    pub fn verifier(&self) -> RsaVerifier {
        RsaVerifier {
            algorithm: self.algorithm,
            key: self.key.to_public_key(),
        }
    }
}

impl Signer for RsaSigner {
    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let (scheme, digest) = prepare(self.algorithm, message)?;
        self.key.sign(scheme, &digest).map_err(|e| {
            debug!(?e, algorithm = %self.algorithm, "RSA signing failed");
            Error::SigningError(format!("RSA {} signing failed: {e}", self.algorithm))
        })
    }
}

impl fmt::Debug for RsaSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaSigner")
            .field("algorithm", &self.algorithm)
            .field("bits", &self.modulus_bits())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// RSASSA-PKCS1-v1_5 verifier (RS256, RS384, RS512)
#[derive(Debug, Clone)]
pub struct RsaVerifier {
    algorithm: Algorithm,
    key: RsaPublicKey,
}

impl RsaVerifier {
    /// Load a public key PEM (SPKI or PKCS#1) with the default key policy
    ///
    /// A private key PEM is accepted too; only its public half is kept.
    pub fn new(algorithm: Algorithm, pem: &str) -> Result<Self> {
        Self::with_policy(algorithm, pem, &RsaKeyPolicy::default())
    }

    pub fn with_policy(algorithm: Algorithm, pem: &str, policy: &RsaKeyPolicy) -> Result<Self> {
        algorithm.expect_family(AlgorithmFamily::Rsa)?;
        let key = parse_public_key(pem, policy)?;
        Ok(Self { algorithm, key })
    }

    pub fn from_key(algorithm: Algorithm, key: RsaPublicKey, policy: &RsaKeyPolicy) -> Result<Self> {
        algorithm.expect_family(AlgorithmFamily::Rsa)?;
        check_modulus(&key, policy)?;
        Ok(Self { algorithm, key })
    }

    pub fn sha256(pem: &str) -> Result<Self> {
        Self::new(Algorithm::RS256, pem)
    }

    pub fn sha384(pem: &str) -> Result<Self> {
        Self::new(Algorithm::RS384, pem)
    }

    pub fn sha512(pem: &str) -> Result<Self> {
        Self::new(Algorithm::RS512, pem)
    }

    pub fn modulus_bits(&self) -> usize {
        modulus_bits(&self.key)
    }
}

impl Verifier for RsaVerifier {
    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        let (scheme, digest) = prepare(self.algorithm, message)?;
        self.key.verify(scheme, &digest, signature).map_err(|e| {
            debug!(?e, algorithm = %self.algorithm, "RSA signature rejected");
            Error::InvalidSignature
        })
    }
}

/// Padding scheme and message digest for one RS* algorithm
fn prepare(algorithm: Algorithm, message: &[u8]) -> Result<(Pkcs1v15Sign, Vec<u8>)> {
    match algorithm {
        Algorithm::RS256 => Ok((Pkcs1v15Sign::new::<Sha256>(), Sha256::digest(message).to_vec())),
        Algorithm::RS384 => Ok((Pkcs1v15Sign::new::<Sha384>(), Sha384::digest(message).to_vec())),
        Algorithm::RS512 => Ok((Pkcs1v15Sign::new::<Sha512>(), Sha512::digest(message).to_vec())),
        other => Err(Error::UnsupportedAlgorithm(format!(
            "{other} is not an RSA algorithm"
        ))),
    }
}
