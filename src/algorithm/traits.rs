use super::Algorithm;
use crate::error::Result;

/// Produces signatures under one fixed algorithm
///
/// Implementations hold only immutable key material, so one signer can be
/// shared across threads and called concurrently.
pub trait Signer: Send + Sync {
    /// The algorithm this signer writes into the `alg` header
    fn algorithm(&self) -> Algorithm;

    /// Sign `message` (the ASCII signing input `header.claims`)
    ///
    /// Returns the raw signature bytes, not Base64URL.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>>;
}

/// Checks signatures under one fixed algorithm
///
/// The verifier is chosen by the caller, never by the token: the decoder
/// rejects any token whose `alg` differs from [`Verifier::algorithm`].
pub trait Verifier: Send + Sync {
    /// The only algorithm this verifier accepts
    fn algorithm(&self) -> Algorithm;

    /// Verify raw signature bytes over `message`
    ///
    /// Fails with [`Error::InvalidSignature`](crate::Error::InvalidSignature)
    /// when the signature does not match.
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()>;
}
