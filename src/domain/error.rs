//! Domain validation errors.

use thiserror::Error;

/// Errors raised while constructing or mutating domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A field failed validation. Carries the field name.
    #[error("invalid {0}: invalid parameter")]
    InvalidParameter(&'static str),
}

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
