//! Invitation audit entry entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::error::DomainResult;
use domain::models::AuditEntry;

use super::parse_column;

/// Database row mapping for the invitation_audit_entries table.
#[derive(Debug, Clone, FromRow)]
pub struct AuditEntryEntity {
    pub id: Uuid,
    pub invitation_id: Uuid,
    pub action: String,
    pub actor_id: Option<Uuid>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditEntryEntity {
    pub fn into_domain(self) -> DomainResult<AuditEntry> {
        Ok(AuditEntry {
            id: self.id,
            invitation_id: self.invitation_id,
            action: parse_column(&self.action, "action")?,
            actor_id: self.actor_id,
            note: self.note,
            created_at: self.created_at,
        })
    }
}
