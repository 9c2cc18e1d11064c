pub mod base64url;

#[cfg(feature = "rsa")]
pub(crate) mod der;

pub use base64url::{decode, decode_bytes, encode, encode_bytes};
