use formtree::TreeError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error("a validation key can't be blank here")]
    BlankKey,
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("a path can only be validated against a target holding data")]
    NoData,
}
