//! Domain error model.

use thiserror::Error;

/// Result type used across the console's domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Policy decisions never produce one of these: a denied check is a `false`
/// or an invalid validation outcome. This type covers the directory and
/// session boundary (lookups, form input, credentials).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. a blank form field).
    #[error("{0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The requested user does not exist.
    #[error("User not found")]
    NotFound,

    /// Email/password pair did not match any account.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The acting identity is not allowed to perform the operation.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
