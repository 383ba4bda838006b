//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent registry invariant violations and failed lookups.
/// These are independent of filesystem and CLI concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A category segment or the leaf key could not be located.
    #[error("unable to find play '{key}' under '{path}'")]
    NotFound { path: String, key: String },

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A sibling with the same name already exists.
    #[error("duplicate entry '{name}' under '{path}'")]
    Duplicate { path: String, name: String },

    #[error("module path must have at least one segment")]
    EmptyPath,

    #[error("invalid model index: {0}")]
    InvalidIndex(String),
}

/// Result type for registry operations.
pub type DomainResult<T> = Result<T, DomainError>;
