//! Organization reference types.
//!
//! The directory hosts two organization shapes: companies and associations.
//! Invitations and memberships are polymorphic over the two.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Kind of organization an invitation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrgKind {
    Company,
    Association,
}

impl FromStr for OrgKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "company" | "companies" => Ok(OrgKind::Company),
            "association" | "associations" => Ok(OrgKind::Association),
            _ => Err(format!("Unknown organization kind: {}", s)),
        }
    }
}

impl std::fmt::Display for OrgKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrgKind::Company => write!(f, "company"),
            OrgKind::Association => write!(f, "association"),
        }
    }
}

/// A reference to an organization: id plus kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgRef {
    pub id: Uuid,
    pub kind: OrgKind,
}

impl OrgRef {
    pub fn company(id: Uuid) -> Self {
        Self {
            id,
            kind: OrgKind::Company,
        }
    }

    pub fn association(id: Uuid) -> Self {
        Self {
            id,
            kind: OrgKind::Association,
        }
    }
}

/// Denormalized organization attributes for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OrganizationSummary {
    pub id: Uuid,
    pub kind: OrgKind,
    pub name: String,
}
