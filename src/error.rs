//! Error types for the glkit GitLab client and utilities.

use thiserror::Error;

/// Base32 codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Invalid base32 character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },

    #[error("Invalid base32 length: {0} significant characters")]
    InvalidLength(usize),

    #[error("Misplaced padding at position {0}")]
    MisplacedPadding(usize),

    #[error("Non-zero trailing bits in final base32 symbol")]
    TrailingBits,

    #[error("Decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// GitLab API errors.
///
/// Every failure of the client surfaces as one of these variants. Variants that
/// originate from an HTTP response carry the status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("GitLab request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("GitLab authentication failed with status {status}: {message}")]
    Authentication { status: u16, message: String },

    #[error("HTTP transport error: {0}")]
    Transport(String),

    #[error("Failed to parse GitLab response: {0}")]
    Parse(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

impl ApiError {
    /// HTTP status code of the response that caused this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } | ApiError::Authentication { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        ApiError::Http {
            status: 404,
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
