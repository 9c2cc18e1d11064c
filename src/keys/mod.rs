//! Key material for signers and verifiers
//!
//! - [`HmacSecret`]: shared secret bytes for HS256/384/512, zeroed on drop
//! - [`RsaKeyPolicy`]: modulus size bounds enforced when RSA keys are loaded
//! - [`PemBlock`]: RFC 7468 framing shared by every RSA key format

pub mod pem;

#[cfg(feature = "rsa")]
pub(crate) mod rsa;

pub use pem::{PemBlock, PemLabel};

use crate::error::{Error, Result};
use std::fmt;
use zeroize::Zeroizing;

/// Shared secret for HMAC algorithms
///
/// No minimum length is enforced beyond "not empty"; callers that want a
/// secret at least as long as the hash output should check that themselves.
#[derive(Clone)]
pub struct HmacSecret {
    bytes: Zeroizing<Vec<u8>>,
}

impl HmacSecret {
    /// Create a secret from raw bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = Zeroizing::new(bytes.into());
        if bytes.is_empty() {
            return Err(Error::InvalidKey("HMAC secret must not be empty".to_string()));
        }
        Ok(Self { bytes })
    }

    /// Create a secret from text (its UTF-8 bytes)
    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(text.as_bytes())
    }

    /// Secret length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: empty secrets cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for HmacSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HmacSecret([REDACTED])")
    }
}

/// Default minimum RSA modulus size
pub const DEFAULT_MIN_RSA_BITS: usize = 2048;

/// Default maximum RSA modulus size
pub const DEFAULT_MAX_RSA_BITS: usize = 16384;

/// Constraints applied to RSA keys when they are loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsaKeyPolicy {
    min_bits: usize,
    max_bits: usize,
    allow_weak: bool,
}

impl Default for RsaKeyPolicy {
    fn default() -> Self {
        Self {
            min_bits: DEFAULT_MIN_RSA_BITS,
            max_bits: DEFAULT_MAX_RSA_BITS,
            allow_weak: false,
        }
    }
}

impl RsaKeyPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require at least `bits` bits of modulus
    pub fn min_bits(mut self, bits: usize) -> Self {
        self.min_bits = bits;
        self
    }

    /// Refuse keys with more than `bits` bits of modulus
    pub fn max_bits(mut self, bits: usize) -> Self {
        self.max_bits = bits;
        self
    }

    /// Accept keys below the minimum (testing and legacy interop only)
    pub fn allow_weak_keys(mut self) -> Self {
        self.allow_weak = true;
        self
    }

    pub fn minimum_bits(&self) -> usize {
        self.min_bits
    }

    pub fn maximum_bits(&self) -> usize {
        self.max_bits
    }

    /// Reject a modulus outside the configured bounds
    ///
    /// Too small is `WeakKey` (unless weak keys are allowed); too large is
    /// `UnsupportedKey`.
    pub fn check(&self, bits: usize) -> Result<()> {
        if bits > self.max_bits {
            return Err(Error::UnsupportedKey(format!(
                "RSA modulus of {bits} bits exceeds the {} bit maximum",
                self.max_bits
            )));
        }
        if bits < self.min_bits && !self.allow_weak {
            return Err(Error::WeakKey {
                bits,
                min: self.min_bits,
            });
        }
        Ok(())
    }
}
