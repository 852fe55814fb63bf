//! In-memory store fakes for driving the domain services without a database.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use uuid::Uuid;

use domain::acceptance::AcceptanceSaga;
use domain::error::{DomainError, DomainResult};
use domain::issuance::{InvitationIssuer, IssueRequest};
use domain::models::{
    AdminPrivilege, AssociationManagerRecord, AuditEntry, CompanyRole, Invitation,
    InvitationStatus, InviteRole, MemberRecord, NewAssociationManager, NewAuditEntry,
    NewInvitation, NewMember, OrgKind, OrgRef, OrganizationSummary,
};
use domain::role_resolution::RoleResolver;
use domain::stores::{
    AuditLog, IdentityProvider, InvitationStore, MembershipStore, NewIdentity, OrganizationStore,
};

#[derive(Default)]
pub struct FakeInvitationStore {
    rows: Mutex<HashMap<Uuid, Invitation>>,
}

impl FakeInvitationStore {
    pub fn get(&self, id: Uuid) -> Option<Invitation> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    /// Test hook: backdate an invitation's expiry.
    pub fn set_expiry(&self, id: Uuid, expires_at: DateTime<Utc>) {
        if let Some(row) = self.rows.lock().unwrap().get_mut(&id) {
            row.expires_at = expires_at;
        }
    }
}

#[async_trait]
impl InvitationStore for FakeInvitationStore {
    async fn create(&self, input: NewInvitation) -> DomainResult<Invitation> {
        let invitation = Invitation {
            id: Uuid::new_v4(),
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            organization: input.organization,
            role: input.role,
            designation: input.designation,
            department: input.department,
            token_digest: input.token_digest,
            expires_at: input.expires_at,
            status: InvitationStatus::Pending,
            invited_by: input.invited_by,
            accepted_at: None,
            accepted_by: None,
            created_at: Utc::now(),
        };
        self.rows
            .lock()
            .unwrap()
            .insert(invitation.id, invitation.clone());
        Ok(invitation)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Invitation>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn find_pending_by_digest(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<Invitation>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|row| {
                row.token_digest == digest
                    && row.status == InvitationStatus::Pending
                    && row.expires_at >= now
            })
            .cloned())
    }

    async fn rotate_secret(
        &self,
        id: Uuid,
        digest: &str,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<Invitation> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound("Invitation not found".to_string()))?;
        if row.status.is_terminal() {
            return Err(DomainError::Conflict(
                "Invitation is no longer pending".to_string(),
            ));
        }
        row.token_digest = digest.to_string();
        row.expires_at = expires_at;
        row.status = InvitationStatus::Pending;
        Ok(row.clone())
    }

    async fn mark_accepted(
        &self,
        id: Uuid,
        accepted_by: Uuid,
        now: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id) {
            Some(row) if row.status == InvitationStatus::Pending && row.expires_at >= now => {
                row.status = InvitationStatus::Accepted;
                row.accepted_at = Some(now);
                row.accepted_by = Some(accepted_by);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_revoked(&self, id: Uuid) -> DomainResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id) {
            Some(row) if row.status == InvitationStatus::Pending => {
                row.status = InvitationStatus::Revoked;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_by_organization(&self, organization: OrgRef) -> DomainResult<Vec<Invitation>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|row| row.organization == organization)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct FakeMembershipStore {
    members: Mutex<Vec<MemberRecord>>,
    managers: Mutex<Vec<AssociationManagerRecord>>,
    admins: Mutex<HashMap<Uuid, AdminPrivilege>>,
    pub fail_member_insert: AtomicBool,
    pub fail_manager_insert: AtomicBool,
}

impl FakeMembershipStore {
    pub fn members(&self) -> Vec<MemberRecord> {
        self.members.lock().unwrap().clone()
    }

    pub fn managers(&self) -> Vec<AssociationManagerRecord> {
        self.managers.lock().unwrap().clone()
    }

    pub fn grant_member(&self, user_id: Uuid, company_id: Option<Uuid>, role: CompanyRole) {
        self.members.lock().unwrap().push(MemberRecord {
            id: Uuid::new_v4(),
            user_id,
            company_id,
            role,
            designation: None,
            department: None,
            active: true,
        });
    }

    pub fn grant_managership(&self, user_id: Uuid, association_id: Uuid) {
        self.managers.lock().unwrap().push(AssociationManagerRecord {
            id: Uuid::new_v4(),
            user_id,
            association_id,
            active: true,
        });
    }

    pub fn grant_admin(&self, user_id: Uuid, is_super: bool, is_hidden: bool) {
        self.admins.lock().unwrap().insert(
            user_id,
            AdminPrivilege {
                user_id,
                is_super,
                is_hidden,
            },
        );
    }

    pub fn deactivate_memberships(&self, user_id: Uuid) {
        self.members
            .lock()
            .unwrap()
            .retain(|m| m.user_id != user_id);
        self.managers
            .lock()
            .unwrap()
            .retain(|m| m.user_id != user_id);
    }
}

#[async_trait]
impl MembershipStore for FakeMembershipStore {
    async fn insert_member(&self, input: NewMember) -> DomainResult<MemberRecord> {
        if self.fail_member_insert.load(Ordering::SeqCst) {
            return Err(DomainError::Dependency(
                "member insert failure injected".to_string(),
            ));
        }
        let record = MemberRecord {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            company_id: input.company_id,
            role: input.role,
            designation: input.designation,
            department: input.department,
            active: true,
        };
        self.members.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn delete_member(&self, id: Uuid) -> DomainResult<()> {
        self.members.lock().unwrap().retain(|m| m.id != id);
        Ok(())
    }

    async fn insert_association_manager(
        &self,
        input: NewAssociationManager,
    ) -> DomainResult<AssociationManagerRecord> {
        if self.fail_manager_insert.load(Ordering::SeqCst) {
            return Err(DomainError::Dependency(
                "manager insert failure injected".to_string(),
            ));
        }
        let record = AssociationManagerRecord {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            association_id: input.association_id,
            active: true,
        };
        self.managers.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn delete_association_manager(&self, id: Uuid) -> DomainResult<()> {
        self.managers.lock().unwrap().retain(|m| m.id != id);
        Ok(())
    }

    async fn active_members(&self, user_id: Uuid) -> DomainResult<Vec<MemberRecord>> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id && m.active)
            .cloned()
            .collect())
    }

    async fn active_managerships(
        &self,
        user_id: Uuid,
    ) -> DomainResult<Vec<AssociationManagerRecord>> {
        Ok(self
            .managers
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id && m.active)
            .cloned()
            .collect())
    }

    async fn admin_privilege(&self, user_id: Uuid) -> DomainResult<Option<AdminPrivilege>> {
        Ok(self.admins.lock().unwrap().get(&user_id).cloned())
    }
}

#[derive(Default)]
pub struct FakeOrganizationStore {
    companies: Mutex<HashMap<Uuid, String>>,
    associations: Mutex<HashMap<Uuid, String>>,
    pub fail_find: AtomicBool,
}

impl FakeOrganizationStore {
    pub fn add_company(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.companies.lock().unwrap().insert(id, name.to_string());
        id
    }

    pub fn add_association(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.associations.lock().unwrap().insert(id, name.to_string());
        id
    }
}

#[async_trait]
impl OrganizationStore for FakeOrganizationStore {
    async fn find(&self, organization: OrgRef) -> DomainResult<Option<OrganizationSummary>> {
        if self.fail_find.load(Ordering::SeqCst) {
            return Err(DomainError::Dependency(
                "organization lookup failure injected".to_string(),
            ));
        }
        let name = match organization.kind {
            OrgKind::Company => self.companies.lock().unwrap().get(&organization.id).cloned(),
            OrgKind::Association => self
                .associations
                .lock()
                .unwrap()
                .get(&organization.id)
                .cloned(),
        };
        Ok(name.map(|name| OrganizationSummary {
            id: organization.id,
            kind: organization.kind,
            name,
        }))
    }
}

#[derive(Default)]
pub struct FakeAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl FakeAuditLog {
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditLog for FakeAuditLog {
    async fn append(&self, entry: NewAuditEntry) -> DomainResult<AuditEntry> {
        let entry = AuditEntry {
            id: Uuid::new_v4(),
            invitation_id: entry.invitation_id,
            action: entry.action,
            actor_id: entry.actor_id,
            note: entry.note,
            created_at: Utc::now(),
        };
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn entries_for(&self, invitation_id: Uuid) -> DomainResult<Vec<AuditEntry>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.invitation_id == invitation_id)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct FakeIdentity {
    pub id: Uuid,
    pub email: String,
}

/// Enforces email uniqueness the way the real auth service does.
#[derive(Default)]
pub struct FakeIdentityProvider {
    identities: Mutex<Vec<FakeIdentity>>,
}

impl FakeIdentityProvider {
    pub fn identities(&self) -> Vec<FakeIdentity> {
        self.identities.lock().unwrap().clone()
    }

    pub fn add_existing(&self, email: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.identities.lock().unwrap().push(FakeIdentity {
            id,
            email: email.to_string(),
        });
        id
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn create_identity(&self, input: NewIdentity) -> DomainResult<Uuid> {
        let mut identities = self.identities.lock().unwrap();
        if identities
            .iter()
            .any(|i| i.email.eq_ignore_ascii_case(&input.email))
        {
            return Err(DomainError::Conflict(
                "Email already registered".to_string(),
            ));
        }
        let id = Uuid::new_v4();
        identities.push(FakeIdentity {
            id,
            email: input.email,
        });
        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Uuid>> {
        Ok(self
            .identities
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.email.eq_ignore_ascii_case(email))
            .map(|i| i.id))
    }

    async fn delete_identity(&self, id: Uuid) -> DomainResult<()> {
        self.identities.lock().unwrap().retain(|i| i.id != id);
        Ok(())
    }
}

/// All fakes wired together, plus constructors for the services under test.
pub struct TestWorld {
    pub invitations: Arc<FakeInvitationStore>,
    pub memberships: Arc<FakeMembershipStore>,
    pub organizations: Arc<FakeOrganizationStore>,
    pub identities: Arc<FakeIdentityProvider>,
    pub audit: Arc<FakeAuditLog>,
}

impl TestWorld {
    pub fn new() -> Self {
        Self {
            invitations: Arc::new(FakeInvitationStore::default()),
            memberships: Arc::new(FakeMembershipStore::default()),
            organizations: Arc::new(FakeOrganizationStore::default()),
            identities: Arc::new(FakeIdentityProvider::default()),
            audit: Arc::new(FakeAuditLog::default()),
        }
    }

    pub fn issuer(&self) -> InvitationIssuer {
        InvitationIssuer::new(
            self.invitations.clone(),
            self.memberships.clone(),
            self.organizations.clone(),
            self.audit.clone(),
        )
    }

    pub fn saga(&self) -> AcceptanceSaga {
        AcceptanceSaga::new(
            self.invitations.clone(),
            self.memberships.clone(),
            self.organizations.clone(),
            self.identities.clone(),
            self.audit.clone(),
        )
    }

    pub fn resolver(&self) -> RoleResolver {
        RoleResolver::new(self.memberships.clone(), self.organizations.clone())
    }

    /// A company plus a user who owns it, ready to issue invitations.
    pub fn company_with_owner(&self, name: &str) -> (Uuid, Uuid) {
        let company_id = self.organizations.add_company(name);
        let owner_id = Uuid::new_v4();
        self.memberships
            .grant_member(owner_id, Some(company_id), CompanyRole::Owner);
        (company_id, owner_id)
    }

    /// An association plus a user who manages it.
    pub fn association_with_manager(&self, name: &str) -> (Uuid, Uuid) {
        let association_id = self.organizations.add_association(name);
        let manager_id = Uuid::new_v4();
        self.memberships.grant_managership(manager_id, association_id);
        (association_id, manager_id)
    }
}

/// A realistic invitee address for tests that do not care about the value.
pub fn random_email() -> String {
    SafeEmail().fake()
}

pub fn issue_request(email: &str, organization: OrgRef, role: InviteRole) -> IssueRequest {
    IssueRequest {
        email: email.to_string(),
        first_name: "Test".to_string(),
        last_name: "Invitee".to_string(),
        organization,
        role,
        designation: None,
        department: None,
    }
}
