//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the banker arbiter.
#[derive(Error, Debug)]
pub enum Error {
    /// Inconsistent construction inputs. Fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed allocation request (surfaced to callers as `Fail`).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Release vector the process cannot give back.
    #[error("invalid release: {0}")]
    InvalidRelease(String),

    /// Malformed scenario input.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Broken state invariant.
    #[error("internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenience constructors
impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn invalid_release(msg: impl Into<String>) -> Self {
        Self::InvalidRelease(msg.into())
    }

    pub fn parse(line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error should abort the run rather than fail one operation.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::InvalidRequest(_) | Error::InvalidRelease(_))
    }
}
