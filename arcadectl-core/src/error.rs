/// Structured error types for arcadectl-core and the client stores.
///
/// Uses `thiserror` for better API surface and error composition.
/// The binary crate (arcadectl-cli) can still use `anyhow` for convenience,
/// but library consumers get structured, composable errors.

use std::io;
use thiserror::Error;

/// Main error type for arcadectl operations
#[derive(Error, Debug)]
pub enum ArcadeError {
    /// I/O operation failed (token file, config file)
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// The catalog API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Bearer token rejected; the stored token has been purged
    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// Could not reach the catalog API at all
    #[error("transport error: {reason}")]
    Transport { reason: String },

    /// Response body was not the JSON shape we expected
    #[error("decode error in {context}: {source}")]
    Decode {
        context: String,
        source: serde_json::Error,
    },

    /// Client-side validation rejected the input before any network call
    #[error("validation error: {reason}")]
    Validation { reason: String },

    /// An action the current session is not allowed to take
    #[error("forbidden: {reason}")]
    Forbidden { reason: String },

    /// Configuration file missing or malformed
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for arcadectl operations
pub type Result<T> = std::result::Result<T, ArcadeError>;

impl ArcadeError {
    /// Create an API error from a status code and server message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Create a transport error
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    /// Create a decode error with context
    pub fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            context: context.into(),
            source,
        }
    }

    /// Create a validation error
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// True when the failure came from a rejected bearer token
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ArcadeError::Unauthorized { .. } | ArcadeError::Api { status: 401, .. }
        )
    }
}
