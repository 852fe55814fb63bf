//! Invitation issuance, resending and revocation.
//!
//! The issuer creates pending invitation rows and hands the raw secret back
//! to its caller exactly once, for out-of-band delivery. The resender rotates
//! the secret and expiry of a non-terminal invitation; overwriting the digest
//! is the sole revocation mechanism for a leaked or unused secret.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use shared::crypto;

use crate::error::{DomainError, DomainResult};
use crate::models::invitation::{issue_expiry, resend_expiry};
use crate::models::{
    AuditAction, Invitation, InviteRole, NewAuditEntry, NewInvitation, OrgKind, OrgRef,
    OrganizationSummary, MAX_BULK_ERRORS,
};
use crate::stores::{AuditLog, InvitationStore, MembershipStore, OrganizationStore};

/// Request to issue a single invitation.
#[derive(Debug, Clone)]
pub struct IssueRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub organization: OrgRef,
    pub role: InviteRole,
    pub designation: Option<String>,
    pub department: Option<String>,
}

/// A freshly issued (or re-issued) invitation together with its raw secret.
///
/// The secret exists only here and in the recipient's inbox; it is never
/// persisted.
#[derive(Debug, Clone)]
pub struct IssuedInvitation {
    pub invitation: Invitation,
    pub secret: String,
    pub organization: OrganizationSummary,
}

/// Aggregated outcome of a bulk issuance.
///
/// One failing row never aborts the batch; failures are counted and a
/// bounded list of error messages is reported back.
#[derive(Debug)]
pub struct BulkIssueOutcome {
    pub issued: Vec<IssuedInvitation>,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Creates, resends and revokes invitations.
#[derive(Clone)]
pub struct InvitationIssuer {
    invitations: Arc<dyn InvitationStore>,
    memberships: Arc<dyn MembershipStore>,
    organizations: Arc<dyn OrganizationStore>,
    audit: Arc<dyn AuditLog>,
}

impl InvitationIssuer {
    pub fn new(
        invitations: Arc<dyn InvitationStore>,
        memberships: Arc<dyn MembershipStore>,
        organizations: Arc<dyn OrganizationStore>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            invitations,
            memberships,
            organizations,
            audit,
        }
    }

    /// Issues a new invitation on behalf of `actor`.
    ///
    /// The actor must hold a privileged membership in the target organization
    /// (company owner/admin, association manager) or platform-admin
    /// privilege, checked against live membership data. Expiry is a fixed
    /// seven days from issuance. A duplicate outstanding invitation for the
    /// same (email, organization) pair is not rejected here; deduplication is
    /// a caller UX concern.
    pub async fn issue(&self, request: IssueRequest, actor: Uuid) -> DomainResult<IssuedInvitation> {
        validate_role_for_kind(request.role, request.organization.kind)?;

        let organization = self
            .organizations
            .find(request.organization)
            .await?
            .ok_or_else(|| DomainError::NotFound("Organization not found".to_string()))?;

        self.require_privilege(actor, request.organization).await?;

        let secret = crypto::generate_invite_secret();
        let now = Utc::now();

        let invitation = self
            .invitations
            .create(NewInvitation {
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                organization: request.organization,
                role: request.role,
                designation: request.designation,
                department: request.department,
                token_digest: crypto::digest_secret(&secret),
                expires_at: issue_expiry(now),
                invited_by: Some(actor),
            })
            .await?;

        self.audit
            .append(NewAuditEntry::new(
                invitation.id,
                AuditAction::Issued,
                Some(actor),
            ))
            .await?;

        info!(
            invitation_id = %invitation.id,
            organization_id = %invitation.organization.id,
            organization_kind = %invitation.organization.kind,
            role = %invitation.role,
            "Issued invitation"
        );

        Ok(IssuedInvitation {
            invitation,
            secret,
            organization,
        })
    }

    /// Issues many invitations in one call, with per-row failure isolation.
    pub async fn issue_bulk(
        &self,
        rows: Vec<IssueRequest>,
        actor: Uuid,
    ) -> DomainResult<BulkIssueOutcome> {
        let mut issued = Vec::new();
        let mut failed = 0usize;
        let mut errors = Vec::new();

        for (index, row) in rows.into_iter().enumerate() {
            let email = row.email.clone();
            match self.issue(row, actor).await {
                Ok(outcome) => issued.push(outcome),
                Err(err) => {
                    failed += 1;
                    if errors.len() < MAX_BULK_ERRORS {
                        errors.push(format!("row {} ({}): {}", index + 1, email, err));
                    }
                }
            }
        }

        let succeeded = issued.len();
        info!(succeeded, failed, "Bulk invitation issuance finished");

        Ok(BulkIssueOutcome {
            issued,
            succeeded,
            failed,
            errors,
        })
    }

    /// Rotates the secret and expiry of a pending or expired invitation.
    ///
    /// Privilege is re-checked against current membership; having held the
    /// privilege at issuance time is not enough. The fresh expiry is a fixed
    /// 48 hours.
    pub async fn resend(&self, invitation_id: Uuid, actor: Uuid) -> DomainResult<IssuedInvitation> {
        let invitation = self
            .invitations
            .find_by_id(invitation_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Invitation not found".to_string()))?;

        if !invitation.can_resend() {
            return Err(DomainError::Conflict(format!(
                "Cannot resend an invitation that is {}",
                invitation.status
            )));
        }

        self.require_privilege(actor, invitation.organization).await?;

        let organization = self
            .organizations
            .find(invitation.organization)
            .await?
            .ok_or_else(|| DomainError::NotFound("Organization not found".to_string()))?;

        let secret = crypto::generate_invite_secret();
        let invitation = self
            .invitations
            .rotate_secret(
                invitation_id,
                &crypto::digest_secret(&secret),
                resend_expiry(Utc::now()),
            )
            .await?;

        self.audit
            .append(NewAuditEntry::new(
                invitation.id,
                AuditAction::Resent,
                Some(actor),
            ))
            .await?;

        info!(invitation_id = %invitation.id, "Resent invitation with rotated secret");

        Ok(IssuedInvitation {
            invitation,
            secret,
            organization,
        })
    }

    /// Revokes a pending invitation. Terminal invitations cannot be revoked.
    pub async fn revoke(&self, invitation_id: Uuid, actor: Uuid) -> DomainResult<()> {
        let invitation = self
            .invitations
            .find_by_id(invitation_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Invitation not found".to_string()))?;

        if invitation.status.is_terminal() {
            return Err(DomainError::Conflict(format!(
                "Cannot revoke an invitation that is {}",
                invitation.status
            )));
        }

        self.require_privilege(actor, invitation.organization).await?;

        if !self.invitations.mark_revoked(invitation_id).await? {
            return Err(DomainError::Conflict(
                "Invitation was accepted or revoked concurrently".to_string(),
            ));
        }

        self.audit
            .append(NewAuditEntry::new(
                invitation_id,
                AuditAction::Revoked,
                Some(actor),
            ))
            .await?;

        info!(invitation_id = %invitation_id, "Revoked invitation");
        Ok(())
    }

    /// Lists invitations for an organization the actor may manage.
    pub async fn list(
        &self,
        organization: OrgRef,
        actor: Uuid,
    ) -> DomainResult<Vec<Invitation>> {
        if self.organizations.find(organization).await?.is_none() {
            return Err(DomainError::NotFound("Organization not found".to_string()));
        }
        self.require_privilege(actor, organization).await?;
        self.invitations.list_by_organization(organization).await
    }

    /// Checks that `actor` currently holds management rights over the
    /// organization. Platform admins qualify for any organization.
    async fn require_privilege(&self, actor: Uuid, organization: OrgRef) -> DomainResult<()> {
        if self.memberships.admin_privilege(actor).await?.is_some() {
            return Ok(());
        }

        let privileged = match organization.kind {
            OrgKind::Company => self
                .memberships
                .active_members(actor)
                .await?
                .iter()
                .any(|m| m.company_id == Some(organization.id) && m.role.is_privileged()),
            OrgKind::Association => self
                .memberships
                .active_managerships(actor)
                .await?
                .iter()
                .any(|m| m.association_id == organization.id),
        };

        if privileged {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "You do not manage this organization".to_string(),
            ))
        }
    }
}

/// Company invitations may grant owner/admin/member; association invitations
/// may grant manager/member.
fn validate_role_for_kind(role: InviteRole, kind: OrgKind) -> DomainResult<()> {
    let valid = match kind {
        OrgKind::Company => matches!(
            role,
            InviteRole::Owner | InviteRole::Admin | InviteRole::Member
        ),
        OrgKind::Association => matches!(role, InviteRole::Manager | InviteRole::Member),
    };

    if valid {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "Role '{}' cannot be granted for a {}",
            role, kind
        )))
    }
}
