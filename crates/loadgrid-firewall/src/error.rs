//! Admission filter error types.

use thiserror::Error;

/// Result type alias for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors raised for malformed address or range literals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("invalid IPv4 address: {0:?}")]
    InvalidAddress(String),

    #[error("invalid CIDR prefix length in {rule:?}: must be 0-32")]
    InvalidPrefix { rule: String },
}
