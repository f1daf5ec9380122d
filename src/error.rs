//! Error types for dotbag

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BagError {
    #[error("Cannot modify guarded attributes at '{0}'. Use mutate() to write while guarded")]
    ImmutabilityViolation(String),

    #[error("Value at '{0}' is not a function")]
    NotInvocable(String),

    #[error("Cannot write through '{0}': value is not a map or array")]
    NotTraversable(String),

    #[error("Path parse error: {0}")]
    ParseError(String),

    #[error("Attributes must be a mapping, got {0}")]
    NotAMapping(String),

    #[error("Call failed: {0}")]
    CallFailed(String),
}

pub type Result<T> = std::result::Result<T, BagError>;
