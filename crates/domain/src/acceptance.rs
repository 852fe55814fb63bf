//! The invitation acceptance saga.
//!
//! Identity provisioning and membership provisioning live in two systems
//! with no shared transaction boundary, so atomicity is approximated with a
//! saga: forward steps gated on each other, explicit compensation on
//! failure, and a single compare-and-set on the invitation status as the
//! concurrency guard against double-acceptance.
//!
//! States: presented -> validated -> identity-provisioned ->
//! membership-provisioned -> committed, with rollback reachable from any
//! provisioning state.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use shared::crypto;
use shared::validation::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

use crate::error::{DomainError, DomainResult};
use crate::models::{
    AuditAction, CompanyRole, Invitation, NewAssociationManager, NewAuditEntry, NewMember,
    OrgKind, OrganizationSummary,
};
use crate::stores::{
    AuditLog, IdentityProvider, InvitationStore, MembershipStore, NewIdentity, OrganizationStore,
};

/// A presented secret plus the credentials for the account to create.
#[derive(Debug, Clone)]
pub struct AcceptRequest {
    pub secret: String,
    pub password: String,
    /// Optional override of the name captured at issuance.
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// The account and memberships left behind by a committed acceptance.
#[derive(Debug, Clone)]
pub struct AcceptedAccount {
    pub user_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub invitation: Invitation,
    pub organization: Option<OrganizationSummary>,
}

/// Membership rows inserted by one acceptance attempt, kept for compensation.
#[derive(Debug, Default)]
struct ProvisionedMemberships {
    member_id: Option<Uuid>,
    manager_id: Option<Uuid>,
}

/// Drives a presented secret through validation, provisioning and commit.
#[derive(Clone)]
pub struct AcceptanceSaga {
    invitations: Arc<dyn InvitationStore>,
    memberships: Arc<dyn MembershipStore>,
    organizations: Arc<dyn OrganizationStore>,
    identities: Arc<dyn IdentityProvider>,
    audit: Arc<dyn AuditLog>,
}

impl AcceptanceSaga {
    pub fn new(
        invitations: Arc<dyn InvitationStore>,
        memberships: Arc<dyn MembershipStore>,
        organizations: Arc<dyn OrganizationStore>,
        identities: Arc<dyn IdentityProvider>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            invitations,
            memberships,
            organizations,
            identities,
            audit,
        }
    }

    /// Accepts an invitation by its raw secret.
    ///
    /// Callers never observe a half-provisioned identity: any failure after
    /// identity creation compensates by deleting what this attempt created
    /// before the error is surfaced. The saga is not retriable as a whole; a
    /// retry must re-enter here with the secret.
    pub async fn accept(&self, request: AcceptRequest) -> DomainResult<AcceptedAccount> {
        if request.password.len() < MIN_PASSWORD_LENGTH
            || request.password.len() > MAX_PASSWORD_LENGTH
        {
            return Err(DomainError::Validation(format!(
                "Password must be between {} and {} characters",
                MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
            )));
        }

        // Step 1: validate. Fail closed on no match; the response never
        // distinguishes a wrong secret from an expired one.
        let digest = crypto::digest_secret(&request.secret);
        let invitation = self
            .invitations
            .find_pending_by_digest(&digest, Utc::now())
            .await?
            .ok_or(DomainError::InvalidOrExpired)?;

        // Step 2: identity uniqueness pre-check. Nothing has been created
        // yet, so this is a plain abort, not a rollback.
        if self
            .identities
            .find_by_email(&invitation.email)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(
                "An account with this email already exists, sign in instead".to_string(),
            ));
        }

        // Step 3: provision the identity, email pre-confirmed.
        let first_name = request
            .first_name
            .unwrap_or_else(|| invitation.first_name.clone());
        let last_name = request
            .last_name
            .unwrap_or_else(|| invitation.last_name.clone());

        let user_id = self
            .identities
            .create_identity(NewIdentity {
                email: invitation.email.clone(),
                password: request.password,
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                email_confirmed: true,
            })
            .await?;

        // Step 4: provision memberships, compensating the identity on
        // failure.
        let provisioned = match self.provision_memberships(&invitation, user_id).await {
            Ok(p) => p,
            Err(err) => {
                warn!(
                    invitation_id = %invitation.id,
                    "Membership provisioning failed, rolling back identity"
                );
                self.rollback_identity(user_id).await;
                return Err(err);
            }
        };

        // Step 5: commit. The conditional update on status=pending is the
        // sole serialization point; losing it means another request consumed
        // the invitation concurrently.
        let now = Utc::now();
        let committed = match self.invitations.mark_accepted(invitation.id, user_id, now).await {
            Ok(committed) => committed,
            Err(err) => {
                self.rollback_memberships(&provisioned).await;
                self.rollback_identity(user_id).await;
                return Err(err);
            }
        };

        if !committed {
            self.rollback_memberships(&provisioned).await;
            self.rollback_identity(user_id).await;
            return Err(DomainError::Conflict("Invitation already used".to_string()));
        }

        // Step 6: best-effort audit. The commit above is authoritative; an
        // audit failure does not roll anything back.
        if let Err(err) = self
            .audit
            .append(NewAuditEntry::new(
                invitation.id,
                AuditAction::Accepted,
                Some(user_id),
            ))
            .await
        {
            warn!(invitation_id = %invitation.id, %err, "Audit append failed after commit");
        }

        // The commit already happened; a failed summary lookup must not make
        // a provisioned account look like a failed acceptance.
        let organization = match self.organizations.find(invitation.organization).await {
            Ok(organization) => organization,
            Err(err) => {
                warn!(
                    invitation_id = %invitation.id,
                    organization_id = %invitation.organization.id,
                    %err,
                    "Organization lookup failed after commit"
                );
                None
            }
        };

        info!(
            invitation_id = %invitation.id,
            user_id = %user_id,
            organization_id = %invitation.organization.id,
            "Invitation accepted"
        );

        let mut invitation = invitation;
        invitation.status = crate::models::InvitationStatus::Accepted;
        invitation.accepted_at = Some(now);
        invitation.accepted_by = Some(user_id);

        Ok(AcceptedAccount {
            user_id,
            email: invitation.email.clone(),
            first_name,
            last_name,
            invitation,
            organization,
        })
    }

    /// Inserts the membership rows the invitation calls for. Cleans up its
    /// own partial inserts before surfacing an error.
    async fn provision_memberships(
        &self,
        invitation: &Invitation,
        user_id: Uuid,
    ) -> DomainResult<ProvisionedMemberships> {
        let mut provisioned = ProvisionedMemberships::default();

        match invitation.organization.kind {
            OrgKind::Company => {
                let role = company_role_for(invitation);
                let member = self
                    .memberships
                    .insert_member(NewMember {
                        user_id,
                        company_id: Some(invitation.organization.id),
                        role,
                        designation: invitation.designation.clone(),
                        department: invitation.department.clone(),
                    })
                    .await?;
                provisioned.member_id = Some(member.id);
            }
            OrgKind::Association => {
                // Association invitees always get baseline platform access,
                // regardless of privilege level.
                let member = self
                    .memberships
                    .insert_member(NewMember {
                        user_id,
                        company_id: None,
                        role: CompanyRole::Member,
                        designation: invitation.designation.clone(),
                        department: invitation.department.clone(),
                    })
                    .await?;
                provisioned.member_id = Some(member.id);

                if invitation.role.is_privileged() {
                    let manager = match self
                        .memberships
                        .insert_association_manager(NewAssociationManager {
                            user_id,
                            association_id: invitation.organization.id,
                        })
                        .await
                    {
                        Ok(manager) => manager,
                        Err(err) => {
                            self.rollback_memberships(&provisioned).await;
                            return Err(err);
                        }
                    };
                    provisioned.manager_id = Some(manager.id);
                }
            }
        }

        Ok(provisioned)
    }

    /// Deletes membership rows inserted by this attempt. Compensation is
    /// attempted even if individual deletes fail; failures are logged and
    /// skipped.
    async fn rollback_memberships(&self, provisioned: &ProvisionedMemberships) {
        if let Some(manager_id) = provisioned.manager_id {
            if let Err(err) = self.memberships.delete_association_manager(manager_id).await {
                error!(%manager_id, %err, "Compensation failed: association manager row left behind");
            }
        }
        if let Some(member_id) = provisioned.member_id {
            if let Err(err) = self.memberships.delete_member(member_id).await {
                error!(%member_id, %err, "Compensation failed: member row left behind");
            }
        }
    }

    /// Deletes the identity created by this attempt, logging on failure.
    async fn rollback_identity(&self, user_id: Uuid) {
        if let Err(err) = self.identities.delete_identity(user_id).await {
            error!(%user_id, %err, "Compensation failed: identity left behind");
        }
    }
}

/// The company role granted on acceptance, copied from the invitation.
fn company_role_for(invitation: &Invitation) -> CompanyRole {
    match invitation.role {
        crate::models::InviteRole::Owner => CompanyRole::Owner,
        crate::models::InviteRole::Admin => CompanyRole::Admin,
        // Manager is rejected for company invitations at issuance; if one
        // slips through it grants no more than member.
        crate::models::InviteRole::Member | crate::models::InviteRole::Manager => {
            CompanyRole::Member
        }
    }
}
