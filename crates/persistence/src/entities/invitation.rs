//! Invitation entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::error::DomainResult;
use domain::models::{Invitation, OrgRef};

use super::parse_column;

/// Database row mapping for the invitations table.
///
/// `token_digest` holds the SHA-256 hex digest of the invitation secret;
/// the secret itself is never stored. `status` only ever holds `pending`,
/// `accepted` or `revoked`; expiry is derived from `expires_at` on read.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationEntity {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub organization_id: Uuid,
    pub organization_kind: String,
    pub role: String,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub token_digest: String,
    pub expires_at: DateTime<Utc>,
    pub status: String,
    pub invited_by: Option<Uuid>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub accepted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl InvitationEntity {
    pub fn into_domain(self) -> DomainResult<Invitation> {
        Ok(Invitation {
            id: self.id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            organization: OrgRef {
                id: self.organization_id,
                kind: parse_column(&self.organization_kind, "organization_kind")?,
            },
            role: parse_column(&self.role, "role")?,
            designation: self.designation,
            department: self.department,
            token_digest: self.token_digest,
            expires_at: self.expires_at,
            status: parse_column(&self.status, "status")?,
            invited_by: self.invited_by,
            accepted_at: self.accepted_at,
            accepted_by: self.accepted_by,
            created_at: self.created_at,
        })
    }
}
