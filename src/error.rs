//! Error types for otpkeep.
//!
//! The code generator and the URI parser return their own small enums so
//! callers can match on them directly; everything else funnels into
//! [`Error`].

use thiserror::Error;

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("OTP error: {0}")]
    Otp(#[from] OtpError),

    #[error("Malformed otpauth URI: {0}")]
    Uri(#[from] UriError),

    #[error("QR error: {0}")]
    Qr(#[from] QrError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),

    /// Command line input that cannot be acted on.
    #[error("{0}")]
    Input(String),
}

/// Failures while generating a code.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpError {
    #[error("secret does not decode to any key bytes")]
    InvalidSecret,

    #[error("period must be a positive number of seconds")]
    InvalidPeriod,

    #[error("digits must be a positive number")]
    InvalidDigits,
}

/// Reasons an otpauth URI is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    #[error("not a URI: {0}")]
    Unparseable(String),

    #[error("scheme must be otpauth, got {0:?}")]
    WrongScheme(String),

    #[error("only totp URIs are supported, got {0:?}")]
    WrongHost(String),

    #[error("missing secret parameter")]
    MissingSecret,

    #[error("unsupported algorithm {0:?}, only SHA1 is supported")]
    UnsupportedAlgorithm(String),
}

/// QR image decoding errors.
#[derive(Error, Debug)]
pub enum QrError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("not a readable image: {0}")]
    Image(#[from] image::ImageError),

    #[error("{width}x{height} pixels do not match the image data")]
    Dimensions { width: usize, height: usize },

    #[error("no QR code found in the image")]
    NoPayload,
}

/// Credential store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt store file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no credential matches {0:?}")]
    NotFound(String),

    #[error("{query:?} matches {count} credentials, use the id")]
    Ambiguous { query: String, count: usize },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;
