use super::{Algorithm, AlgorithmFamily, Signer, Verifier};
use crate::error::{Error, Result};
use crate::keys::HmacSecret;

use constant_time_eq::constant_time_eq;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use tracing::debug;
use zeroize::Zeroizing;

/// HMAC signer (HS256, HS384, HS512)
#[derive(Debug, Clone)]
pub struct HmacSigner {
    algorithm: Algorithm,
    secret: HmacSecret,
}

impl HmacSigner {
    pub fn new(algorithm: Algorithm, secret: HmacSecret) -> Result<Self> {
        algorithm.expect_family(AlgorithmFamily::Hmac)?;
        Ok(Self { algorithm, secret })
    }

    /// Signer over the raw bytes of `secret`
    pub fn from_bytes(algorithm: Algorithm, secret: &[u8]) -> Result<Self> {
        Self::new(algorithm, HmacSecret::new(secret)?)
    }

    /// HS256 signer over the UTF-8 bytes of `secret`
    pub fn sha256(secret: &str) -> Result<Self> {
        Self::new(Algorithm::HS256, HmacSecret::from_text(secret)?)
    }

    /// HS384 signer over the UTF-8 bytes of `secret`
    pub fn sha384(secret: &str) -> Result<Self> {
        Self::new(Algorithm::HS384, HmacSecret::from_text(secret)?)
    }

    /// HS512 signer over the UTF-8 bytes of `secret`
    pub fn sha512(secret: &str) -> Result<Self> {
        Self::new(Algorithm::HS512, HmacSecret::from_text(secret)?)
    }

    /// Verifier for the same algorithm and secret
    pub fn verifier(&self) -> HmacVerifier {
        HmacVerifier {
            algorithm: self.algorithm,
            secret: self.secret.clone(),
        }
    }
}

impl Signer for HmacSigner {
    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        compute(self.algorithm, self.secret.expose(), message).map(|tag| tag.to_vec())
    }
}

/// HMAC verifier (HS256, HS384, HS512)
#[derive(Debug, Clone)]
pub struct HmacVerifier {
    algorithm: Algorithm,
    secret: HmacSecret,
}

impl HmacVerifier {
    pub fn new(algorithm: Algorithm, secret: HmacSecret) -> Result<Self> {
        algorithm.expect_family(AlgorithmFamily::Hmac)?;
        Ok(Self { algorithm, secret })
    }

    pub fn from_bytes(algorithm: Algorithm, secret: &[u8]) -> Result<Self> {
        Self::new(algorithm, HmacSecret::new(secret)?)
    }

    pub fn sha256(secret: &str) -> Result<Self> {
        Self::new(Algorithm::HS256, HmacSecret::from_text(secret)?)
    }

    pub fn sha384(secret: &str) -> Result<Self> {
        Self::new(Algorithm::HS384, HmacSecret::from_text(secret)?)
    }

    pub fn sha512(secret: &str) -> Result<Self> {
        Self::new(Algorithm::HS512, HmacSecret::from_text(secret)?)
    }
}

impl Verifier for HmacVerifier {
    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Recompute the tag and compare in constant time
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        let expected = compute(self.algorithm, self.secret.expose(), message)?;

        // constant_time_eq short-circuits only on length, which is public
        if constant_time_eq(signature, &expected) {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }
}

/// One MAC instance per call, so signers never share mutable state
fn compute(algorithm: Algorithm, secret: &[u8], message: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    match algorithm {
        Algorithm::HS256 => mac::<Hmac<Sha256>>(secret, message),
        Algorithm::HS384 => mac::<Hmac<Sha384>>(secret, message),
        Algorithm::HS512 => mac::<Hmac<Sha512>>(secret, message),
        other => Err(Error::UnsupportedAlgorithm(format!(
            "{other} is not an HMAC algorithm"
        ))),
    }
}

fn mac<M: Mac + KeyInit>(secret: &[u8], message: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let mut mac = <M as KeyInit>::new_from_slice(secret).map_err(|e| {
        debug!(?e, "failed to initialize HMAC");
        Error::SigningError("failed to initialize HMAC".to_string())
    })?;
    mac.update(message);
    Ok(Zeroizing::new(mac.finalize().into_bytes().to_vec()))
}
