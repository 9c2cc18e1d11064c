//! Errors for jwtforge
//!
//! Every variant is safe to log: messages carry algorithm names, claim names,
//! timestamps and parser diagnostics, never key material or secrets.

use thiserror::Error;

/// jwtforge errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Malformed claim '{claim}': {reason}")]
    MalformedClaim { claim: String, reason: String },

    // ============================================================================
    // Key Errors
    // ============================================================================
    #[error("Malformed key: {0}")]
    MalformedKey(String),

    #[error("Unsupported key: {0}")]
    UnsupportedKey(String),

    #[error("Weak key: RSA modulus is {bits} bits (minimum: {min} bits)")]
    WeakKey { bits: usize, min: usize },

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    // ============================================================================
    // Algorithm Errors
    // ============================================================================
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Algorithm '{found}' not allowed. Allowed: {allowed:?}")]
    DisallowedAlgorithm { found: String, allowed: Vec<String> },

    #[error("Algorithm mismatch: verifier expects '{expected}', token declares '{found}'")]
    AlgorithmMismatch { expected: String, found: String },

    #[error("No verifier available: {0}")]
    MissingVerifier(String),

    // ============================================================================
    // Signature Errors
    // ============================================================================
    #[error("Signature verification failed")]
    InvalidSignature,

    #[error("Signing failed: {0}")]
    SigningError(String),

    // ============================================================================
    // Claim Validation Errors
    // ============================================================================
    #[error("Token expired: {claim}={timestamp} (now: {now}, skew: {skew}s)")]
    Expired {
        claim: &'static str,
        timestamp: i64,
        now: i64,
        skew: u64,
    },

    #[error("Token not valid until {not_before} (now: {now}, skew: {skew}s)")]
    NotYetValid { not_before: i64, now: i64, skew: u64 },

    #[error("Issuer mismatch: expected '{expected}', found {found:?}")]
    IssuerMismatch {
        expected: String,
        found: Option<String>,
    },

    #[error("Audience mismatch: expected '{expected}', found {found:?}")]
    AudienceMismatch {
        expected: String,
        found: Vec<String>,
    },
}

/// Error category, without context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedToken,
    MalformedClaim,
    MalformedKey,
    UnsupportedKey,
    WeakKey,
    InvalidKey,
    UnsupportedAlgorithm,
    DisallowedAlgorithm,
    AlgorithmMismatch,
    MissingVerifier,
    InvalidSignature,
    SigningError,
    Expired,
    NotYetValid,
    IssuerMismatch,
    AudienceMismatch,
}

impl Error {
    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedToken(_) => ErrorKind::MalformedToken,
            Error::MalformedClaim { .. } => ErrorKind::MalformedClaim,
            Error::MalformedKey(_) => ErrorKind::MalformedKey,
            Error::UnsupportedKey(_) => ErrorKind::UnsupportedKey,
            Error::WeakKey { .. } => ErrorKind::WeakKey,
            Error::InvalidKey(_) => ErrorKind::InvalidKey,
            Error::UnsupportedAlgorithm(_) => ErrorKind::UnsupportedAlgorithm,
            Error::DisallowedAlgorithm { .. } => ErrorKind::DisallowedAlgorithm,
            Error::AlgorithmMismatch { .. } => ErrorKind::AlgorithmMismatch,
            Error::MissingVerifier(_) => ErrorKind::MissingVerifier,
            Error::InvalidSignature => ErrorKind::InvalidSignature,
            Error::SigningError(_) => ErrorKind::SigningError,
            Error::Expired { .. } => ErrorKind::Expired,
            Error::NotYetValid { .. } => ErrorKind::NotYetValid,
            Error::IssuerMismatch { .. } => ErrorKind::IssuerMismatch,
            Error::AudienceMismatch { .. } => ErrorKind::AudienceMismatch,
        }
    }

    pub(crate) fn malformed_claim(claim: &str, reason: impl Into<String>) -> Self {
        Error::MalformedClaim {
            claim: claim.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for jwtforge operations
pub type Result<T> = std::result::Result<T, Error>;
