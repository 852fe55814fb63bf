//! Domain error types.

use thiserror::Error;

/// Errors surfaced by invitation provisioning and role resolution.
///
/// `InvalidOrExpired` deliberately does not distinguish a wrong secret from
/// a stale one, so a caller cannot probe which of the two is true.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("This invitation is no longer valid")]
    InvalidOrExpired,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Dependency failure: {0}")]
    Dependency(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Whether the error is one the caller caused, as opposed to an
    /// infrastructure failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, DomainError::Dependency(_))
    }
}
