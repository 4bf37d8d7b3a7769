//! Error types for configuration resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors produced while resolving, loading, or reading configuration data.
///
/// Per-file parse failures are deliberately absent: `load()` logs and skips
/// an unparseable file rather than aborting the whole merge.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was requested without a default and is unset.
    #[error("${0} is not set in the environment")]
    MissingEnvironmentVariable(String),

    /// An environment variable's value could not be evaluated as a literal.
    #[error("could not evaluate {value:?} from ${var} as a literal")]
    InvalidLiteral { var: String, value: String },

    /// An evaluated value had the wrong type for the requested reader.
    #[error("expected {expected} from ${var}, got {value:?}")]
    TypeMismatch {
        var: String,
        expected: &'static str,
        value: String,
    },

    /// The reserved overlay key was present but its value is not a mapping.
    #[error("`{key}` in {} must be a mapping, found {found}", .file.display())]
    OverlayType {
        key: &'static str,
        file: PathBuf,
        found: &'static str,
    },

    /// No version was supplied and none could be detected.
    #[error("no version supplied for service `{0}` and detection failed")]
    NoVersionInfo(String),

    /// An indexed read was performed on a key that is not present.
    #[error("key `{0}` is not present in the configuration")]
    KeyMissing(String),

    /// Filesystem failure outside the benign already-exists case.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvironmentVariable(var.into())
    }

    pub fn invalid_literal(var: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidLiteral {
            var: var.into(),
            value: value.into(),
        }
    }

    pub fn type_mismatch(
        var: impl Into<String>,
        expected: &'static str,
        value: impl ToString,
    ) -> Self {
        Self::TypeMismatch {
            var: var.into(),
            expected,
            value: value.to_string(),
        }
    }
}
