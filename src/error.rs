//! Unified error types for Bibliotheque.
//!
//! The statistics engine is total and never fails. Errors only surface at
//! the edges: loading configuration and parsing library backups. Callers at
//! those edges usually prefer a safe default over a hard failure, which is
//! what [`FailOpen`] provides.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Bibliotheque operations.
#[derive(Error, Debug)]
pub enum BiblioError {
    /// I/O errors from config or backup files.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON or TOML parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// A book record that cannot be used at all (e.g. missing id).
    #[error("invalid record {id}: {message}")]
    InvalidRecord { id: String, message: String },
}

/// A specialized Result type for Bibliotheque operations.
pub type Result<T> = std::result::Result<T, BiblioError>;

impl BiblioError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid record error.
    pub fn invalid_record(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            id: id.into(),
            message: message.into(),
        }
    }
}

impl From<io::Error> for BiblioError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for BiblioError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Log-and-default handling for errors at the crate edges.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Handle an error by logging a warning and returning the provided fallback.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (using default)", context, err);
                T::default()
            }
        }
    }

    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (using fallback)", context, err);
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = BiblioError::storage(
            "/tmp/config.toml",
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );
        assert!(err.to_string().contains("storage error"));
        assert!(err.to_string().contains("/tmp/config.toml"));
    }

    #[test]
    fn test_serde_error_display() {
        let err = BiblioError::serde("invalid JSON");
        assert_eq!(err.to_string(), "serialization error: invalid JSON");
    }

    #[test]
    fn test_config_error_display() {
        let err = BiblioError::config("invalid TOML");
        assert_eq!(err.to_string(), "config error: invalid TOML");
    }

    #[test]
    fn test_invalid_record_display() {
        let err = BiblioError::invalid_record("b1", "empty id");
        assert_eq!(err.to_string(), "invalid record b1: empty id");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: BiblioError = io_err.into();
        assert!(matches!(err, BiblioError::Storage { .. }));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: BiblioError = json_err.into();
        assert!(matches!(err, BiblioError::Serde { .. }));
    }

    #[test]
    fn test_fail_open_default() {
        let result: Result<Vec<String>> = Err(BiblioError::config("test"));
        let value = result.fail_open_default("test context");
        assert!(value.is_empty());
    }

    #[test]
    fn test_fail_open_with() {
        let result: Result<u32> = Err(BiblioError::serde("test"));
        assert_eq!(result.fail_open_with("test context", 24), 24);
    }

    #[test]
    fn test_fail_open_success() {
        let result: Result<u32> = Ok(12);
        assert_eq!(result.fail_open_default("test context"), 12);
    }
}
