//! Compact serialization: `base64url(header).base64url(claims).base64url(signature)`

mod decoder;
mod encoder;
mod header;
mod jwt;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use header::Header;
pub use jwt::Jwt;

/// Longest token the decoder will look at, in bytes
pub const MAX_TOKEN_LENGTH: usize = 64 * 1024;
