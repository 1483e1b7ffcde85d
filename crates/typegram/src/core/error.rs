//! Core error types for type analysis and diagram emission
//!
//! Every failure in the pipeline is fatal: the first error aborts the run and
//! no partial diagram is produced.

use thiserror::Error;

/// Result alias used throughout the core
pub type Result<T> = std::result::Result<T, TypegramError>;

/// Core error types for type analysis and diagram emission
#[derive(Error, Debug)]
pub enum TypegramError {
    /// A mandatory type descriptor is absent
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A descriptor whose flags contradict each other
    #[error("Malformed descriptor `{type_name}`: {message}")]
    MalformedDescriptor { type_name: String, message: String },

    #[error("Load error: {message}")]
    LoadError { message: String },

    #[error("Manifest error: {source}")]
    ManifestError {
        #[from]
        source: serde_json::Error,
    },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl TypegramError {
    /// Create a new invalid-input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new malformed-descriptor error
    pub fn malformed(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedDescriptor {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create a new load error
    pub fn load_error(message: impl Into<String>) -> Self {
        Self::LoadError {
            message: message.into(),
        }
    }
}
