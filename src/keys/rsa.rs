//! RSA key loading from PEM
//!
//! | PEM label         | DER structure          |
//! |-------------------|------------------------|
//! | `RSA PRIVATE KEY` | PKCS#1 RSAPrivateKey   |
//! | `PRIVATE KEY`     | PKCS#8 PrivateKeyInfo  |
//! | `PUBLIC KEY`      | SubjectPublicKeyInfo   |
//! | `RSA PUBLIC KEY`  | PKCS#1 RSAPublicKey    |

use super::pem::{PemBlock, PemLabel};
use super::RsaKeyPolicy;
use crate::error::{Error, Result};
use crate::utils::der;

use ::der::Decode;
use rsa::pkcs1::{self, DecodeRsaPrivateKey};
use rsa::pkcs8::DecodePrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use tracing::debug;

/// Parse an RSA private key and enforce the modulus policy
pub(crate) fn parse_private_key(pem: &str, policy: &RsaKeyPolicy) -> Result<RsaPrivateKey> {
    let block = PemBlock::parse(pem)?;
    let key = private_key_from_block(&block)?;
    check_modulus(&key, policy)?;
    debug!(label = %block.label(), bits = modulus_bits(&key), "loaded RSA private key");
    Ok(key)
}

/// Parse an RSA public key and enforce the modulus policy
///
/// A private key PEM is accepted as well; its public half is used.
pub(crate) fn parse_public_key(pem: &str, policy: &RsaKeyPolicy) -> Result<RsaPublicKey> {
    let block = PemBlock::parse(pem)?;
    let key = match block.label() {
        PemLabel::PublicKey => {
            public_key_from_pkcs1(der::rsa_subject_public_key(block.der())?, policy)?
        }
        PemLabel::RsaPublicKey => public_key_from_pkcs1(block.der(), policy)?,
        PemLabel::RsaPrivateKey | PemLabel::PrivateKey => {
            let key = private_key_from_block(&block)?.to_public_key();
            check_modulus(&key, policy)?;
            key
        }
    };
    debug!(label = %block.label(), bits = modulus_bits(&key), "loaded RSA public key");
    Ok(key)
}

/// Reject keys whose modulus is outside the policy bounds
pub(crate) fn check_modulus(key: &impl PublicKeyParts, policy: &RsaKeyPolicy) -> Result<()> {
    check_bits(modulus_bits(key), policy)
}

fn check_bits(bits: usize, policy: &RsaKeyPolicy) -> Result<()> {
    if let Err(e) = policy.check(bits) {
        debug!(
            bits,
            min = policy.minimum_bits(),
            max = policy.maximum_bits(),
            "rejected RSA key size"
        );
        return Err(e);
    }
    Ok(())
}

pub(crate) fn modulus_bits(key: &impl PublicKeyParts) -> usize {
    key.n().bits()
}

/// Build a public key from PKCS#1 RSAPublicKey DER
///
/// The modulus ceiling comes from the policy rather than the `rsa` crate's
/// 4096-bit default for public keys.
fn public_key_from_pkcs1(der: &[u8], policy: &RsaKeyPolicy) -> Result<RsaPublicKey> {
    let fields = pkcs1::RsaPublicKey::from_der(der).map_err(malformed)?;
    let n = BigUint::from_bytes_be(fields.modulus.as_bytes());
    let e = BigUint::from_bytes_be(fields.public_exponent.as_bytes());
    check_bits(n.bits(), policy)?;
    RsaPublicKey::new_with_max_size(n, e, policy.maximum_bits()).map_err(malformed)
}

fn private_key_from_block(block: &PemBlock) -> Result<RsaPrivateKey> {
    match block.label() {
        PemLabel::RsaPrivateKey => RsaPrivateKey::from_pkcs1_der(block.der()).map_err(malformed),
        PemLabel::PrivateKey => {
            der::ensure_rsa(der::private_key_algorithm(block.der())?)?;
            RsaPrivateKey::from_pkcs8_der(block.der()).map_err(malformed)
        }
        label => Err(Error::UnsupportedKey(format!(
            "expected a private key, found '{label}'"
        ))),
    }
}

fn malformed(err: impl std::fmt::Display) -> Error {
    Error::MalformedKey(format!("invalid RSA key: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVATE_1024: &str = include_str!("../../tests/fixtures/rsa_private_key_1024.pem");
    const PRIVATE_2048: &str = include_str!("../../tests/fixtures/rsa_private_key_2048.pem");
    const PRIVATE_2048_PKCS8: &str =
        include_str!("../../tests/fixtures/rsa_private_key_2048_pkcs8.pem");
    const PUBLIC_2048: &str = include_str!("../../tests/fixtures/rsa_public_key_2048.pem");
    const PUBLIC_2048_PKCS1: &str =
        include_str!("../../tests/fixtures/rsa_public_key_2048_pkcs1.pem");
    const PUBLIC_4096: &str = include_str!("../../tests/fixtures/rsa_public_key_4096.pem");
    const PRIVATE_8192: &str = include_str!("../../tests/fixtures/rsa_private_key_8192.pem");
    const PUBLIC_8192: &str = include_str!("../../tests/fixtures/rsa_public_key_8192.pem");
    const EC_PRIVATE: &str = include_str!("../../tests/fixtures/ec_private_key_p256.pem");
    const EC_PUBLIC: &str = include_str!("../../tests/fixtures/ec_public_key_p256.pem");

    #[test]
    fn test_pkcs1_and_pkcs8_private_keys_agree() {
        let policy = RsaKeyPolicy::default();
        let a = parse_private_key(PRIVATE_2048, &policy).unwrap();
        let b = parse_private_key(PRIVATE_2048_PKCS8, &policy).unwrap();
        assert_eq!(a, b);
        assert_eq!(modulus_bits(&a), 2048);
    }

    #[test]
    fn test_public_key_formats_agree() {
        let policy = RsaKeyPolicy::default();
        let spki = parse_public_key(PUBLIC_2048, &policy).unwrap();
        let pkcs1 = parse_public_key(PUBLIC_2048_PKCS1, &policy).unwrap();
        let derived = parse_public_key(PRIVATE_2048, &policy).unwrap();
        assert_eq!(spki, pkcs1);
        assert_eq!(spki, derived);
        assert_eq!(
            modulus_bits(&parse_public_key(PUBLIC_4096, &policy).unwrap()),
            4096
        );
    }

    #[test]
    fn test_large_public_key_matches_private_half() {
        let policy = RsaKeyPolicy::default();
        let public = parse_public_key(PUBLIC_8192, &policy).unwrap();
        let private = parse_private_key(PRIVATE_8192, &policy).unwrap();
        assert_eq!(modulus_bits(&public), 8192);
        assert_eq!(public, private.to_public_key());

        let relabeled = pkcs1_public_pem(&public);
        assert_eq!(parse_public_key(&relabeled, &policy).unwrap(), public);
    }

    #[test]
    fn test_modulus_above_maximum_is_unsupported() {
        let policy = RsaKeyPolicy::default().max_bits(4096);
        for pem in [PUBLIC_8192, PRIVATE_8192] {
            assert!(matches!(
                parse_public_key(pem, &policy),
                Err(Error::UnsupportedKey(_))
            ));
        }
        assert!(matches!(
            parse_private_key(PRIVATE_8192, &policy),
            Err(Error::UnsupportedKey(_))
        ));
        assert!(parse_public_key(PUBLIC_4096, &policy).is_ok());
    }

    fn pkcs1_public_pem(key: &RsaPublicKey) -> String {
        use rsa::pkcs1::{EncodeRsaPublicKey, LineEnding};
        key.to_pkcs1_pem(LineEnding::LF).unwrap()
    }

    #[test]
    fn test_weak_key_rejected_by_default() {
        let err = parse_private_key(PRIVATE_1024, &RsaKeyPolicy::default()).unwrap_err();
        assert_eq!(
            err,
            Error::WeakKey {
                bits: 1024,
                min: 2048
            }
        );

        let key = parse_private_key(PRIVATE_1024, &RsaKeyPolicy::default().allow_weak_keys());
        assert!(key.is_ok());
    }

    #[test]
    fn test_public_key_where_private_expected() {
        let err = parse_private_key(PUBLIC_2048, &RsaKeyPolicy::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedKey(_)));
    }

    #[test]
    fn test_ec_keys_unsupported() {
        let policy = RsaKeyPolicy::default();
        assert!(matches!(
            parse_private_key(EC_PRIVATE, &policy),
            Err(Error::UnsupportedKey(_))
        ));
        assert!(matches!(
            parse_public_key(EC_PUBLIC, &policy),
            Err(Error::UnsupportedKey(_))
        ));
    }

    #[test]
    fn test_label_body_mismatch_is_malformed() {
        // SPKI body framed as PKCS#1
        let relabeled = PUBLIC_2048
            .replace("BEGIN PUBLIC KEY", "BEGIN RSA PRIVATE KEY")
            .replace("END PUBLIC KEY", "END RSA PRIVATE KEY");
        assert!(matches!(
            parse_private_key(&relabeled, &RsaKeyPolicy::default()),
            Err(Error::MalformedKey(_))
        ));
    }
}
