//! Invitation domain model.
//!
//! An invitation is a durable, single-use offer of organizational membership
//! bound to a hashed secret and an expiry. The raw secret is never part of
//! this model; only its digest is.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::organization::OrgRef;

/// Expiry window for newly issued invitations, single and bulk alike.
///
/// One deliberate policy per entry point: issuance gives recipients a week.
pub const ISSUE_EXPIRY_DAYS: i64 = 7;

/// Expiry window applied when an invitation is resent.
///
/// A resend is an active nudge, so the fresh secret gets a short fuse.
pub const RESEND_EXPIRY_HOURS: i64 = 48;

/// Upper bound on per-row error messages reported from a bulk issuance.
pub const MAX_BULK_ERRORS: usize = 20;

/// Lifecycle status of an invitation.
///
/// `Accepted` and `Revoked` are terminal. The store only persists `Pending`,
/// `Accepted` and `Revoked`; `Expired` is derived from the expiry timestamp
/// on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Expired,
    Revoked,
}

impl InvitationStatus {
    /// Whether the status permits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, InvitationStatus::Accepted | InvitationStatus::Revoked)
    }
}

impl FromStr for InvitationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvitationStatus::Pending),
            "accepted" => Ok(InvitationStatus::Accepted),
            "expired" => Ok(InvitationStatus::Expired),
            "revoked" => Ok(InvitationStatus::Revoked),
            _ => Err(format!("Unknown invitation status: {}", s)),
        }
    }
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvitationStatus::Pending => write!(f, "pending"),
            InvitationStatus::Accepted => write!(f, "accepted"),
            InvitationStatus::Expired => write!(f, "expired"),
            InvitationStatus::Revoked => write!(f, "revoked"),
        }
    }
}

/// Role granted when an invitation is accepted.
///
/// `Owner`, `Admin` and `Member` apply to companies; `Manager` and `Member`
/// apply to associations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteRole {
    Owner,
    Admin,
    Member,
    Manager,
}

impl InviteRole {
    /// Privileged roles confer management rights over the organization.
    pub fn is_privileged(&self) -> bool {
        matches!(self, InviteRole::Owner | InviteRole::Admin | InviteRole::Manager)
    }
}

impl FromStr for InviteRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(InviteRole::Owner),
            "admin" => Ok(InviteRole::Admin),
            "member" => Ok(InviteRole::Member),
            "manager" => Ok(InviteRole::Manager),
            _ => Err(format!("Unknown invite role: {}", s)),
        }
    }
}

impl std::fmt::Display for InviteRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InviteRole::Owner => write!(f, "owner"),
            InviteRole::Admin => write!(f, "admin"),
            InviteRole::Member => write!(f, "member"),
            InviteRole::Manager => write!(f, "manager"),
        }
    }
}

/// An invitation as held by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Invitation {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub organization: OrgRef,
    pub role: InviteRole,
    pub designation: Option<String>,
    pub department: Option<String>,
    /// SHA-256 hex digest of the secret. Never the secret itself.
    pub token_digest: String,
    pub expires_at: DateTime<Utc>,
    pub status: InvitationStatus,
    pub invited_by: Option<Uuid>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub accepted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// Status as observed at `now`, deriving `Expired` for stale pending rows.
    pub fn effective_status(&self, now: DateTime<Utc>) -> InvitationStatus {
        if self.status == InvitationStatus::Pending && self.expires_at < now {
            InvitationStatus::Expired
        } else {
            self.status
        }
    }

    /// Whether the invitation may be resent: pending or expired, never
    /// accepted or revoked.
    pub fn can_resend(&self) -> bool {
        !self.status.is_terminal()
    }
}

/// Input for creating an invitation row.
#[derive(Debug, Clone)]
pub struct NewInvitation {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub organization: OrgRef,
    pub role: InviteRole,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub token_digest: String,
    pub expires_at: DateTime<Utc>,
    pub invited_by: Option<Uuid>,
}

/// Default expiry for a freshly issued invitation.
pub fn issue_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(ISSUE_EXPIRY_DAYS)
}

/// Fresh expiry applied on resend.
pub fn resend_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::hours(RESEND_EXPIRY_HOURS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::organization::OrgKind;

    fn sample_invitation(status: InvitationStatus, expires_at: DateTime<Utc>) -> Invitation {
        Invitation {
            id: Uuid::new_v4(),
            email: "invitee@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            organization: OrgRef::company(Uuid::new_v4()),
            role: InviteRole::Member,
            designation: None,
            department: None,
            token_digest: "d".repeat(64),
            expires_at,
            status,
            invited_by: Some(Uuid::new_v4()),
            accepted_at: None,
            accepted_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_terminality() {
        assert!(!InvitationStatus::Pending.is_terminal());
        assert!(!InvitationStatus::Expired.is_terminal());
        assert!(InvitationStatus::Accepted.is_terminal());
        assert!(InvitationStatus::Revoked.is_terminal());
    }

    #[test]
    fn test_effective_status_derives_expired() {
        let now = Utc::now();
        let stale = sample_invitation(InvitationStatus::Pending, now - Duration::hours(1));
        assert_eq!(stale.effective_status(now), InvitationStatus::Expired);

        let fresh = sample_invitation(InvitationStatus::Pending, now + Duration::hours(1));
        assert_eq!(fresh.effective_status(now), InvitationStatus::Pending);
    }

    #[test]
    fn test_effective_status_keeps_terminal_states() {
        let now = Utc::now();
        // An accepted invitation stays accepted even past its expiry.
        let accepted = sample_invitation(InvitationStatus::Accepted, now - Duration::hours(1));
        assert_eq!(accepted.effective_status(now), InvitationStatus::Accepted);
    }

    #[test]
    fn test_can_resend() {
        let now = Utc::now();
        assert!(sample_invitation(InvitationStatus::Pending, now).can_resend());
        assert!(!sample_invitation(InvitationStatus::Accepted, now).can_resend());
        assert!(!sample_invitation(InvitationStatus::Revoked, now).can_resend());
    }

    #[test]
    fn test_invite_role_privilege() {
        assert!(InviteRole::Owner.is_privileged());
        assert!(InviteRole::Admin.is_privileged());
        assert!(InviteRole::Manager.is_privileged());
        assert!(!InviteRole::Member.is_privileged());
    }

    #[test]
    fn test_invite_role_roundtrip() {
        for role in [
            InviteRole::Owner,
            InviteRole::Admin,
            InviteRole::Member,
            InviteRole::Manager,
        ] {
            assert_eq!(InviteRole::from_str(&role.to_string()).unwrap(), role);
        }
    }

    #[test]
    fn test_expiry_windows() {
        let now = Utc::now();
        assert_eq!(issue_expiry(now) - now, Duration::days(7));
        assert_eq!(resend_expiry(now) - now, Duration::hours(48));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&InvitationStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&InvitationStatus::Revoked).unwrap(),
            "\"revoked\""
        );
    }

    #[test]
    fn test_org_kind_on_invitation() {
        let inv = sample_invitation(InvitationStatus::Pending, Utc::now());
        assert_eq!(inv.organization.kind, OrgKind::Company);
    }
}
