//! Organization entity (database row mapping).
//!
//! Companies and associations live in separate tables with a shared shape;
//! the kind is supplied by the query, not the row.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{OrgKind, OrganizationSummary};

#[derive(Debug, Clone, FromRow)]
pub struct OrganizationEntity {
    pub id: Uuid,
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl OrganizationEntity {
    pub fn into_summary(self, kind: OrgKind) -> OrganizationSummary {
        OrganizationSummary {
            id: self.id,
            kind,
            name: self.name,
        }
    }
}
