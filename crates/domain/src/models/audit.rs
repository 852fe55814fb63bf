//! Invitation audit trail models.
//!
//! Entries are append-only and never the source of truth for invitation
//! state, only a trail of who did what and when.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Action recorded against an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Issued,
    Resent,
    Accepted,
    Revoked,
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issued" => Ok(AuditAction::Issued),
            "resent" => Ok(AuditAction::Resent),
            "accepted" => Ok(AuditAction::Accepted),
            "revoked" => Ok(AuditAction::Revoked),
            _ => Err(format!("Unknown audit action: {}", s)),
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Issued => write!(f, "issued"),
            AuditAction::Resent => write!(f, "resent"),
            AuditAction::Accepted => write!(f, "accepted"),
            AuditAction::Revoked => write!(f, "revoked"),
        }
    }
}

/// A persisted audit entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AuditEntry {
    pub id: Uuid,
    pub invitation_id: Uuid,
    pub action: AuditAction,
    pub actor_id: Option<Uuid>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for appending an audit entry.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub invitation_id: Uuid,
    pub action: AuditAction,
    pub actor_id: Option<Uuid>,
    pub note: Option<String>,
}

impl NewAuditEntry {
    pub fn new(invitation_id: Uuid, action: AuditAction, actor_id: Option<Uuid>) -> Self {
        Self {
            invitation_id,
            action,
            actor_id,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
