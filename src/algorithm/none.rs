//! Unsecured JWS (`alg: "none"`)
//!
//! These types exist so that producing or accepting an unsigned token is
//! always a visible caller decision. The decoder additionally requires
//! [`AlgorithmPolicy::allow_none`](super::AlgorithmPolicy::allow_none).

use super::{Algorithm, Signer, Verifier};
use crate::error::{Error, Result};

/// Emits an empty signature
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneSigner;

impl Signer for NoneSigner {
    fn algorithm(&self) -> Algorithm {
        Algorithm::None
    }

    fn sign(&self, _message: &[u8]) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

/// Accepts only an empty signature
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneVerifier;

impl Verifier for NoneVerifier {
    fn algorithm(&self) -> Algorithm {
        Algorithm::None
    }

    fn verify(&self, _message: &[u8], signature: &[u8]) -> Result<()> {
        if signature.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_round_trip() {
        let signature = NoneSigner.sign(b"anything").unwrap();
        assert!(signature.is_empty());
        assert!(NoneVerifier.verify(b"anything", &signature).is_ok());
        assert_eq!(NoneSigner.algorithm(), Algorithm::None);
    }

    #[test]
    fn test_none_verifier_rejects_signature_bytes() {
        assert_eq!(
            NoneVerifier.verify(b"anything", b"sig"),
            Err(Error::InvalidSignature)
        );
    }
}
