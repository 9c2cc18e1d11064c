//! DER envelope inspection for PKCS#8 and SubjectPublicKeyInfo structures
//!
//! Both envelopes are generic over the key algorithm. Reading the
//! AlgorithmIdentifier before handing the DER to the RSA decoder lets key
//! parsing tell a well-formed key of the wrong kind (`UnsupportedKey`) apart
//! from bytes that are not a key at all (`MalformedKey`).

use crate::error::{Error, Result};
use der::Decode;
use rsa::pkcs8::PrivateKeyInfo;
use spki::{ObjectIdentifier, SubjectPublicKeyInfoRef};

/// rsaEncryption (RFC 8017 Appendix C)
pub(crate) const RSA_ENCRYPTION_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

const EC_PUBLIC_KEY_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const RSASSA_PSS_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.10");
const ED25519_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");

/// Algorithm OID of a PKCS#8 PrivateKeyInfo
pub(crate) fn private_key_algorithm(der: &[u8]) -> Result<ObjectIdentifier> {
    let info = PrivateKeyInfo::from_der(der)
        .map_err(|e| Error::MalformedKey(format!("invalid PKCS#8 structure: {e}")))?;
    Ok(info.algorithm.oid)
}

/// PKCS#1 RSAPublicKey wrapped by an rsaEncryption SubjectPublicKeyInfo
pub(crate) fn rsa_subject_public_key(der: &[u8]) -> Result<&[u8]> {
    let info = public_key_info(der)?;
    ensure_rsa(info.algorithm.oid)?;
    info.subject_public_key.as_bytes().ok_or_else(|| {
        Error::MalformedKey("SubjectPublicKeyInfo key bits are not octet aligned".to_string())
    })
}

fn public_key_info(der: &[u8]) -> Result<SubjectPublicKeyInfoRef<'_>> {
    SubjectPublicKeyInfoRef::from_der(der)
        .map_err(|e| Error::MalformedKey(format!("invalid SubjectPublicKeyInfo structure: {e}")))
}

/// Reject envelopes that carry anything but an rsaEncryption key
pub(crate) fn ensure_rsa(oid: ObjectIdentifier) -> Result<()> {
    if oid == RSA_ENCRYPTION_OID {
        Ok(())
    } else {
        Err(Error::UnsupportedKey(format!(
            "expected an RSA key, found {}",
            algorithm_name(oid)
        )))
    }
}

fn algorithm_name(oid: ObjectIdentifier) -> String {
    match oid {
        EC_PUBLIC_KEY_OID => "an EC key".to_string(),
        RSASSA_PSS_OID => "an RSASSA-PSS key".to_string(),
        ED25519_OID => "an Ed25519 key".to_string(),
        other => format!("algorithm {other}"),
    }
}
