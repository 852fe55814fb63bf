//! Membership domain models.
//!
//! A single identity may hold zero, one, or many memberships across both
//! organization shapes; the plurality is intentional.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Role within a company membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyRole {
    Owner,
    Admin,
    Member,
}

impl CompanyRole {
    /// Owners and admins may manage the company, including issuing
    /// invitations for it.
    pub fn is_privileged(&self) -> bool {
        matches!(self, CompanyRole::Owner | CompanyRole::Admin)
    }
}

impl FromStr for CompanyRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(CompanyRole::Owner),
            "admin" => Ok(CompanyRole::Admin),
            "member" => Ok(CompanyRole::Member),
            _ => Err(format!("Unknown company role: {}", s)),
        }
    }
}

impl std::fmt::Display for CompanyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompanyRole::Owner => write!(f, "owner"),
            CompanyRole::Admin => write!(f, "admin"),
            CompanyRole::Member => write!(f, "member"),
        }
    }
}

/// A member row. `company_id` is set for company memberships and empty for
/// the baseline platform membership every association invitee receives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_id: Option<Uuid>,
    pub role: CompanyRole,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub active: bool,
}

impl MemberRecord {
    /// Whether this row grants management rights over a specific company.
    pub fn is_company_privileged(&self) -> bool {
        self.company_id.is_some() && self.role.is_privileged()
    }
}

/// Input for inserting a member row.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub user_id: Uuid,
    pub company_id: Option<Uuid>,
    pub role: CompanyRole,
    pub designation: Option<String>,
    pub department: Option<String>,
}

/// An association manager row. The role is implicit: holding an active row
/// makes the identity a manager of that association.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AssociationManagerRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub association_id: Uuid,
    pub active: bool,
}

/// Input for inserting an association manager row.
#[derive(Debug, Clone)]
pub struct NewAssociationManager {
    pub user_id: Uuid,
    pub association_id: Uuid,
}

/// Platform-admin privilege row.
///
/// The distinguished (super/hidden) sub-role requires both flags set; either
/// alone is an ordinary platform admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminPrivilege {
    pub user_id: Uuid,
    pub is_super: bool,
    pub is_hidden: bool,
}

impl AdminPrivilege {
    pub fn is_distinguished(&self) -> bool {
        self.is_super && self.is_hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(company_id: Option<Uuid>, role: CompanyRole) -> MemberRecord {
        MemberRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            company_id,
            role,
            designation: None,
            department: None,
            active: true,
        }
    }

    #[test]
    fn test_company_role_privilege() {
        assert!(CompanyRole::Owner.is_privileged());
        assert!(CompanyRole::Admin.is_privileged());
        assert!(!CompanyRole::Member.is_privileged());
    }

    #[test]
    fn test_company_role_from_str() {
        assert_eq!(CompanyRole::from_str("OWNER").unwrap(), CompanyRole::Owner);
        assert!(CompanyRole::from_str("manager").is_err());
    }

    #[test]
    fn test_member_record_company_privilege() {
        assert!(member(Some(Uuid::new_v4()), CompanyRole::Admin).is_company_privileged());
        assert!(!member(Some(Uuid::new_v4()), CompanyRole::Member).is_company_privileged());
        // A company-less baseline membership grants nothing to manage.
        assert!(!member(None, CompanyRole::Admin).is_company_privileged());
    }

    #[test]
    fn test_admin_privilege_distinguished_requires_both_flags() {
        let both = AdminPrivilege {
            user_id: Uuid::new_v4(),
            is_super: true,
            is_hidden: true,
        };
        assert!(both.is_distinguished());

        let super_only = AdminPrivilege {
            user_id: Uuid::new_v4(),
            is_super: true,
            is_hidden: false,
        };
        assert!(!super_only.is_distinguished());

        let hidden_only = AdminPrivilege {
            user_id: Uuid::new_v4(),
            is_super: false,
            is_hidden: true,
        };
        assert!(!hidden_only.is_distinguished());
    }
}
