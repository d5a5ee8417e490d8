//! Error types for SourceBridge.
//!
//! Library crates use [`SourceBridgeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all SourceBridge operations.
#[derive(Debug, thiserror::Error)]
pub enum SourceBridgeError {
    /// Configuration loading or validation error (fatal at startup).
    #[error("config error: {message}")]
    Config { message: String },

    /// A connector credential is not configured.
    #[error("missing credential: {message}")]
    MissingCredential { message: String },

    /// Caller-supplied value failed validation (bad duration, out-of-range
    /// coordinate, wrong parameter kind, unreachable external resource).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Transport-level failure talking to the remote platform.
    #[error("network error: {0}")]
    Network(String),

    /// The remote platform rejected the request.
    #[error("remote error: {0}")]
    Remote(String),

    /// A response could not be decoded.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SourceBridgeError>;

impl SourceBridgeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a missing-credential error.
    pub fn missing_credential(msg: impl Into<String>) -> Self {
        Self::MissingCredential {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = SourceBridgeError::config("SOURCEBRIDGE_JWT_SECRET is not set");
        assert_eq!(err.to_string(), "config error: SOURCEBRIDGE_JWT_SECRET is not set");

        let err = SourceBridgeError::validation("latitude 91 out of range");
        assert!(err.to_string().contains("latitude 91"));

        let err = SourceBridgeError::Remote("feed not found".into());
        assert_eq!(err.to_string(), "remote error: feed not found");
    }

    #[test]
    fn missing_credential_names_variable() {
        let err = SourceBridgeError::missing_credential("SLACK_BOT_TOKEN");
        assert!(err.to_string().contains("SLACK_BOT_TOKEN"));
    }
}
