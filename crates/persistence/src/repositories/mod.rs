//! Repository implementations of the domain store traits.

pub mod audit_log;
pub mod identity;
pub mod invitation;
pub mod membership;
pub mod organization;

pub use audit_log::AuditLogRepository;
pub use identity::PgIdentityProvider;
pub use invitation::InvitationRepository;
pub use membership::MembershipRepository;
pub use organization::OrganizationRepository;

use domain::error::DomainError;

/// Maps a database failure to a domain dependency error. The underlying
/// error is logged here; callers only see a generic failure.
pub(crate) fn db_error(err: sqlx::Error) -> DomainError {
    tracing::error!(error = %err, "Database operation failed");
    DomainError::Dependency("Database operation failed".to_string())
}
