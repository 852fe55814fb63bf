//! Resolved role types.
//!
//! The role resolver derives a single authoritative role and organizational
//! scope for a session on every authenticated request. The client may assert
//! a preference among roles it actually holds; the hint is filtered, never
//! trusted outright.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::membership::CompanyRole;

/// Role shape a client may hint at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleKind {
    Admin,
    Association,
    Company,
    Member,
}

impl FromStr for RoleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(RoleKind::Admin),
            "association" => Ok(RoleKind::Association),
            "company" => Ok(RoleKind::Company),
            "member" => Ok(RoleKind::Member),
            _ => Err(format!("Unknown role kind: {}", s)),
        }
    }
}

/// Client-asserted role selection.
///
/// Selects among roles the identity legitimately holds; it is not a grant.
/// The organization id disambiguates siblings (manager of two associations,
/// admin of three companies).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct RoleHint {
    pub role: Option<RoleKind>,
    pub organization_id: Option<Uuid>,
}

impl RoleHint {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn role(kind: RoleKind) -> Self {
        Self {
            role: Some(kind),
            organization_id: None,
        }
    }

    pub fn role_in(kind: RoleKind, organization_id: Uuid) -> Self {
        Self {
            role: Some(kind),
            organization_id: Some(organization_id),
        }
    }
}

/// The single authoritative role derived for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ResolvedRole {
    PlatformAdmin,
    /// Platform admin with both the super and hidden flags set.
    DistinguishedAdmin,
    Association {
        association_id: Uuid,
        name: String,
    },
    Company {
        company_id: Uuid,
        name: String,
        company_role: CompanyRole,
    },
    Member {
        company_id: Option<Uuid>,
    },
    None,
}

impl ResolvedRole {
    pub fn is_none(&self) -> bool {
        matches!(self, ResolvedRole::None)
    }
}
