//! Store and collaborator traits implemented by the persistence layer.
//!
//! The acceptance saga spans two systems without a shared transaction
//! boundary: the auth identity store and the relational membership store.
//! Keeping both behind traits lets the saga stay in the domain crate and
//! lets tests drive it against in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainResult;
use crate::models::{
    AdminPrivilege, AssociationManagerRecord, AuditEntry, Invitation, MemberRecord,
    NewAssociationManager, NewAuditEntry, NewInvitation, NewMember, OrgRef, OrganizationSummary,
};

/// Durable record of invitation lifecycles.
#[async_trait]
pub trait InvitationStore: Send + Sync {
    async fn create(&self, input: NewInvitation) -> DomainResult<Invitation>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Invitation>>;

    /// Looks up a pending, unexpired invitation by token digest. Lookup is
    /// always by digest equality, never by raw secret.
    async fn find_pending_by_digest(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<Invitation>>;

    /// Overwrites the stored digest and expiry and forces the status back to
    /// pending. The previous secret becomes permanently unusable the instant
    /// the digest is overwritten. Refuses with `Conflict` once the invitation
    /// has reached a terminal status, so a rotation cannot resurrect an
    /// invitation a concurrent acceptance just consumed.
    async fn rotate_secret(
        &self,
        id: Uuid,
        digest: &str,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<Invitation>;

    /// Compare-and-set pending -> accepted. Must be issued to the store as a
    /// single atomic conditional update, not a read-then-write pair; the
    /// update must also require `expires_at >= now`, so an invitation that
    /// lapsed after validation still loses. Returns whether this caller won
    /// the transition.
    async fn mark_accepted(
        &self,
        id: Uuid,
        accepted_by: Uuid,
        now: DateTime<Utc>,
    ) -> DomainResult<bool>;

    /// Compare-and-set pending -> revoked. Returns whether a row changed.
    async fn mark_revoked(&self, id: Uuid) -> DomainResult<bool>;

    async fn list_by_organization(&self, organization: OrgRef) -> DomainResult<Vec<Invitation>>;
}

/// Organizational membership rows, both shapes.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    async fn insert_member(&self, input: NewMember) -> DomainResult<MemberRecord>;

    async fn delete_member(&self, id: Uuid) -> DomainResult<()>;

    async fn insert_association_manager(
        &self,
        input: NewAssociationManager,
    ) -> DomainResult<AssociationManagerRecord>;

    async fn delete_association_manager(&self, id: Uuid) -> DomainResult<()>;

    /// Active member rows for an identity, company-bound and baseline alike.
    async fn active_members(&self, user_id: Uuid) -> DomainResult<Vec<MemberRecord>>;

    /// Active association managerships for an identity.
    async fn active_managerships(
        &self,
        user_id: Uuid,
    ) -> DomainResult<Vec<AssociationManagerRecord>>;

    /// Platform-admin privilege row, if any.
    async fn admin_privilege(&self, user_id: Uuid) -> DomainResult<Option<AdminPrivilege>>;
}

/// Organization lookups for existence checks and display attributes.
#[async_trait]
pub trait OrganizationStore: Send + Sync {
    async fn find(&self, organization: OrgRef) -> DomainResult<Option<OrganizationSummary>>;
}

/// Append-only invitation audit trail.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(&self, entry: NewAuditEntry) -> DomainResult<AuditEntry>;

    async fn entries_for(&self, invitation_id: Uuid) -> DomainResult<Vec<AuditEntry>>;
}

/// Input for provisioning an identity in the auth service.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// The invitation itself is the confirmation proof, so invited accounts
    /// are created pre-confirmed.
    pub email_confirmed: bool,
}

/// The auth service: authoritative for credential storage and email
/// confirmation state. External collaborator of the acceptance saga.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create_identity(&self, input: NewIdentity) -> DomainResult<Uuid>;

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Uuid>>;

    async fn delete_identity(&self, id: Uuid) -> DomainResult<()>;
}
