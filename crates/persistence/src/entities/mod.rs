//! Database entity definitions.
//!
//! Entities are direct mappings to database rows. Conversions into domain
//! models live next to the entity; a row holding an unknown enum value is
//! reported as a dependency failure rather than panicking.

pub mod audit_entry;
pub mod invitation;
pub mod membership;
pub mod organization;

pub use audit_entry::AuditEntryEntity;
pub use invitation::InvitationEntity;
pub use membership::{AssociationManagerEntity, MemberEntity, PlatformAdminEntity};
pub use organization::OrganizationEntity;

use std::str::FromStr;

use domain::error::{DomainError, DomainResult};

/// Parses a text column into a domain enum.
pub(crate) fn parse_column<T>(value: &str, column: &str) -> DomainResult<T>
where
    T: FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|err: String| DomainError::Dependency(format!("corrupt {column} column: {err}")))
}
