use crate::algorithm::Algorithm;
use crate::claims::Claims;
use crate::token::Header;

/// A decoded token whose signature and claims passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct Jwt {
    header: Header,
    claims: Claims,
    signature: Vec<u8>,
}

impl Jwt {
    pub(crate) fn new(header: Header, claims: Claims, signature: Vec<u8>) -> Self {
        Self {
            header,
            claims,
            signature,
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn algorithm(&self) -> Algorithm {
        self.header.algorithm()
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Raw signature bytes (empty for `alg: "none"`)
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn into_claims(self) -> Claims {
        self.claims
    }

    pub fn into_parts(self) -> (Header, Claims, Vec<u8>) {
        (self.header, self.claims, self.signature)
    }
}
