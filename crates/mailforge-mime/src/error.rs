//! Errors raised while building, encoding or inspecting messages.

use std::string::FromUtf8Error;

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A header name or value that cannot be written as-is (empty name,
    /// line breaks, missing colon).
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// A `Content-Type` value without a `type/subtype` pair.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Malformed quoted-printable or encoded-word input.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Body is not valid base64.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Decoded bytes are not UTF-8 text.
    #[error("UTF-8 decode error: {0}")]
    Utf8Decode(#[from] FromUtf8Error),

    /// A header the builder needs was never set.
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// Neither a text nor an HTML body was given.
    #[error("Message has no body")]
    EmptyBody,
}
