//! Typed error handling for ifacegen.
//!
//! Provides structured errors that library consumers can match on,
//! with the type or path that was being processed when things went wrong.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ifacegen operations.
#[derive(Error, Debug)]
pub enum IfacegenError {
    /// I/O error when reading type libraries or generated output
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Malformed type metadata
    #[error("Malformed metadata for {type_name}: {message}")]
    Metadata { type_name: String, message: String },

    /// A requested type is not known to the metadata provider
    #[error("Type not found: {type_name}")]
    MissingType { type_name: String },

    /// A base-type chain loops back on itself
    #[error("Inheritance cycle detected at {type_name}")]
    InheritanceCycle { type_name: String },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Text store errors (write or commit failures)
    #[error("Store error for {key}: {message}")]
    Store { key: String, message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl IfacegenError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a metadata error for a type.
    pub fn metadata(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Metadata {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create a missing-type error.
    pub fn missing_type(type_name: impl Into<String>) -> Self {
        Self::MissingType {
            type_name: type_name.into(),
        }
    }

    /// Create an inheritance-cycle error.
    pub fn cycle(type_name: impl Into<String>) -> Self {
        Self::InheritanceCycle {
            type_name: type_name.into(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a store error.
    pub fn store(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error.
    ///
    /// Per-type failures are recoverable: a run continues with the
    /// remaining types and reports the failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Metadata { .. }
                | Self::MissingType { .. }
                | Self::InheritanceCycle { .. }
                | Self::Store { .. }
        )
    }

    /// Get the type name associated with this error, if any.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Metadata { type_name, .. } => Some(type_name),
            Self::MissingType { type_name } => Some(type_name),
            Self::InheritanceCycle { type_name } => Some(type_name),
            Self::Store { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for ifacegen results.
pub type IfacegenResult<T> = Result<T, IfacegenError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> IfacegenResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> IfacegenResult<T> {
        self.map_err(|e| IfacegenError::io(path, e))
    }
}
