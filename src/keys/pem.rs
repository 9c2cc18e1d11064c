//! PEM (RFC 7468) framing
//!
//! Anything before the first `-----BEGIN` line is ignored, which covers the
//! `Bag Attributes` preamble OpenSSL writes for PKCS#12 exports and free-form
//! comments. RFC 1421 style headers inside the block (`Proc-Type`,
//! `DEK-Info`) are skipped, but an encrypted block is refused.

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt;
use zeroize::Zeroizing;

/// PEM labels understood by the RSA key loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PemLabel {
    /// `RSA PRIVATE KEY`: PKCS#1 RSAPrivateKey
    RsaPrivateKey,
    /// `PRIVATE KEY`: PKCS#8 PrivateKeyInfo
    PrivateKey,
    /// `PUBLIC KEY`: X.509 SubjectPublicKeyInfo
    PublicKey,
    /// `RSA PUBLIC KEY`: PKCS#1 RSAPublicKey
    RsaPublicKey,
}

impl PemLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            PemLabel::RsaPrivateKey => "RSA PRIVATE KEY",
            PemLabel::PrivateKey => "PRIVATE KEY",
            PemLabel::PublicKey => "PUBLIC KEY",
            PemLabel::RsaPublicKey => "RSA PUBLIC KEY",
        }
    }

    pub fn is_private(self) -> bool {
        matches!(self, PemLabel::RsaPrivateKey | PemLabel::PrivateKey)
    }

    fn from_label(label: &str) -> Result<Self> {
        match label {
            "RSA PRIVATE KEY" => Ok(PemLabel::RsaPrivateKey),
            "PRIVATE KEY" => Ok(PemLabel::PrivateKey),
            "PUBLIC KEY" => Ok(PemLabel::PublicKey),
            "RSA PUBLIC KEY" => Ok(PemLabel::RsaPublicKey),
            "ENCRYPTED PRIVATE KEY" => Err(Error::UnsupportedKey(
                "encrypted private keys are not supported".to_string(),
            )),
            other => Err(Error::UnsupportedKey(format!(
                "unsupported PEM label '{other}'"
            ))),
        }
    }
}

impl fmt::Display for PemLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded PEM block: its label and DER body
pub struct PemBlock {
    label: PemLabel,
    der: Zeroizing<Vec<u8>>,
}

impl PemBlock {
    /// Parse the first PEM block in `text`
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().map(str::trim);

        let label = lines
            .by_ref()
            .find_map(|line| {
                line.strip_prefix("-----BEGIN ")
                    .and_then(|rest| rest.strip_suffix("-----"))
            })
            .ok_or_else(|| Error::MalformedKey("missing PEM BEGIN line".to_string()))?;
        let pem_label = PemLabel::from_label(label)?;

        let mut body = Zeroizing::new(String::new());
        let mut terminated = false;
        for line in lines.by_ref() {
            if let Some(end) = line
                .strip_prefix("-----END ")
                .and_then(|rest| rest.strip_suffix("-----"))
            {
                if end != label {
                    return Err(Error::MalformedKey(format!(
                        "PEM END label '{end}' does not match BEGIN label '{label}'"
                    )));
                }
                terminated = true;
                break;
            }
            if line.is_empty() {
                continue;
            }
            if line.contains(':') {
                if line.starts_with("Proc-Type:") && line.contains("ENCRYPTED") {
                    return Err(Error::UnsupportedKey(
                        "encrypted private keys are not supported".to_string(),
                    ));
                }
                continue;
            }
            body.push_str(line);
        }

        if !terminated {
            return Err(Error::MalformedKey(format!(
                "missing PEM END line for '{label}'"
            )));
        }
        if body.is_empty() {
            return Err(Error::MalformedKey("empty PEM body".to_string()));
        }

        let der = STANDARD
            .decode(body.as_bytes())
            .map_err(|e| Error::MalformedKey(format!("invalid base64 in PEM body: {e}")))?;

        Ok(Self {
            label: pem_label,
            der: Zeroizing::new(der),
        })
    }

    pub fn label(&self) -> PemLabel {
        self.label
    }

    /// DER bytes of the block body
    pub fn der(&self) -> &[u8] {
        &self.der
    }
}

impl fmt::Debug for PemBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PemBlock")
            .field("label", &self.label)
            .field("der", &format_args!("[REDACTED; {} bytes]", self.der.len()))
            .finish()
    }
}
