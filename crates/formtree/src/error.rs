use formtree_path::PathError;
use thiserror::Error;

/// Errors raised by tree operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TreeError {
    #[error("malformed path: {0}")]
    MalformedPath(#[from] PathError),
    #[error("value at '{path}' is {found}, expected {expected}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("the tree is immutable")]
    ImmutableViolation,
    #[error("no value at '{path}'")]
    MissingValue { path: String },
    #[error("shape conflict at '{path}': expected {expected}")]
    ShapeConflict { path: String, expected: &'static str },
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T, E = TreeError> = std::result::Result<T, E>;
