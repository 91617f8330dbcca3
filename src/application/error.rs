//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("cannot read pack file {}: {message}", path.display())]
    InvalidDocument { path: PathBuf, message: String },

    #[error("no file associated with this session, use save-as")]
    NoCurrentFile,

    #[error("unknown catalog category: {0}")]
    UnknownCategory(String),

    #[error("item {item} not found in category {category}")]
    UnknownPreset { category: String, item: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}: {source}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
