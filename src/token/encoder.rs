use crate::algorithm::Signer;
use crate::claims::Claims;
use crate::error::{Error, Result};
use crate::token::Header;
use crate::utils::base64url;
use tracing::trace;

/// Produces compact JWS tokens with one signer
///
/// # Examples
///
/// ```
/// use jwtforge::{Claims, Encoder, HmacSigner};
///
/// let signer = HmacSigner::sha256("secret")?;
/// let token = Encoder::new(&signer).encode(&Claims::new().with_subject("user-42"))?;
/// assert_eq!(token.split('.').count(), 3);
/// # Ok::<(), jwtforge::Error>(())
/// ```
#[derive(Clone, Copy)]
pub struct Encoder<'a> {
    signer: &'a dyn Signer,
}

impl<'a> Encoder<'a> {
    pub fn new(signer: &'a dyn Signer) -> Self {
        Self { signer }
    }

    /// Encode with the default header: `{"alg":<signer alg>,"typ":"JWT"}`
    pub fn encode(&self, claims: &Claims) -> Result<String> {
        self.encode_with_header(&Header::new(self.signer.algorithm()), claims)
    }

    /// Encode with a caller-supplied header
    ///
    /// The header's `alg` must name the signer's algorithm.
    pub fn encode_with_header(&self, header: &Header, claims: &Claims) -> Result<String> {
        let algorithm = self.signer.algorithm();
        if header.algorithm() != algorithm {
            return Err(Error::AlgorithmMismatch {
                expected: algorithm.to_string(),
                found: header.algorithm().to_string(),
            });
        }

        let mut token = base64url::encode(&header.to_json()?);
        token.push('.');
        token.push_str(&base64url::encode(&claims.to_json()?));

        let signature = self.signer.sign(token.as_bytes())?;
        token.push('.');
        token.push_str(&base64url::encode_bytes(&signature));

        trace!(%algorithm, length = token.len(), "encoded token");
        Ok(token)
    }
}
