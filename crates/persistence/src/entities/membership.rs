//! Membership entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::error::DomainResult;
use domain::models::{AdminPrivilege, AssociationManagerRecord, MemberRecord};

use super::parse_column;

/// Database row mapping for the members table.
///
/// `company_id` is null for baseline platform memberships.
#[derive(Debug, Clone, FromRow)]
pub struct MemberEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_id: Option<Uuid>,
    pub role: String,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl MemberEntity {
    pub fn into_domain(self) -> DomainResult<MemberRecord> {
        Ok(MemberRecord {
            id: self.id,
            user_id: self.user_id,
            company_id: self.company_id,
            role: parse_column(&self.role, "role")?,
            designation: self.designation,
            department: self.department,
            active: self.active,
        })
    }
}

/// Database row mapping for the association_managers table. Holding an
/// active row is the managership; there is no role column.
#[derive(Debug, Clone, FromRow)]
pub struct AssociationManagerEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub association_id: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl AssociationManagerEntity {
    pub fn into_domain(self) -> AssociationManagerRecord {
        AssociationManagerRecord {
            id: self.id,
            user_id: self.user_id,
            association_id: self.association_id,
            active: self.active,
        }
    }
}

/// Database row mapping for the platform_admins table.
#[derive(Debug, Clone, FromRow)]
pub struct PlatformAdminEntity {
    pub user_id: Uuid,
    pub is_super: bool,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
}

impl PlatformAdminEntity {
    pub fn into_domain(self) -> AdminPrivilege {
        AdminPrivilege {
            user_id: self.user_id,
            is_super: self.is_super,
            is_hidden: self.is_hidden,
        }
    }
}
