use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Environment failures that stop a run before or outside a validation pass.
///
/// Problems found inside a document are never errors; they are reported as
/// [`Issue`](crate::issue::Issue)s.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read {path}: {source}")]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system traversal error: {path} - {reason}")]
    FileSystemTraversal { path: PathBuf, reason: String },

    #[error("Concurrent operation error: {details}")]
    Concurrency { details: String },
}

impl From<ConfigError> for ValidationError {
    fn from(err: ConfigError) -> Self {
        ValidationError::Config(err.to_string())
    }
}

impl From<regex::Error> for ValidationError {
    fn from(err: regex::Error) -> Self {
        ValidationError::Config(format!("Invalid check pattern: {}", err))
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ValidationError>;
