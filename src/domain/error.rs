//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business rule violations.
/// These are independent of storage and presentation concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("item name must not be empty")]
    EmptyName,

    #[error("item already exists: {0}")]
    DuplicateName(String),

    #[error("item not found: {0}")]
    NotFound(String),

    #[error("invalid volume for {name}: {volume} l")]
    InvalidVolume { name: String, volume: f64 },

    #[error("invalid budget: {message}")]
    InvalidBudget { message: String },

    #[error("invalid catalog: {message}")]
    InvalidCatalog { message: String },
}
