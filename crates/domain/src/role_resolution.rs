//! Role resolution.
//!
//! Derives the single authoritative role and organizational scope for a
//! session, recomputed from the membership tables on every authenticated
//! request so that a revocation takes effect immediately. There is no
//! persisted "current role"; the only client input is a hint that selects
//! among roles the identity actually holds.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::DomainResult;
use crate::models::{
    AssociationManagerRecord, MemberRecord, OrgRef, ResolvedRole, RoleHint, RoleKind,
};
use crate::stores::{MembershipStore, OrganizationStore};

/// Read-side role derivation over live membership data.
#[derive(Clone)]
pub struct RoleResolver {
    memberships: Arc<dyn MembershipStore>,
    organizations: Arc<dyn OrganizationStore>,
}

impl RoleResolver {
    pub fn new(
        memberships: Arc<dyn MembershipStore>,
        organizations: Arc<dyn OrganizationStore>,
    ) -> Self {
        Self {
            memberships,
            organizations,
        }
    }

    /// Resolves the role for `user_id`.
    ///
    /// With a hint, resolution happens strictly within the hinted role; a
    /// hint that matches nothing yields `ResolvedRole::None` rather than
    /// falling through to the default precedence. Without a hint the fixed
    /// precedence applies: platform-admin > association-manager >
    /// company-privileged > member > none.
    pub async fn resolve(&self, user_id: Uuid, hint: RoleHint) -> DomainResult<ResolvedRole> {
        if let Some(kind) = hint.role {
            return self.resolve_hinted(user_id, kind, hint.organization_id).await;
        }

        if let Some(privilege) = self.memberships.admin_privilege(user_id).await? {
            return Ok(admin_role(privilege.is_distinguished()));
        }

        let managerships = self.memberships.active_managerships(user_id).await?;
        if let Some(managership) = managerships.first() {
            return self.association_role(managership.association_id).await;
        }

        let members = self.memberships.active_members(user_id).await?;
        if let Some(member) = members.iter().find(|m| m.is_company_privileged()) {
            return self.company_role(member).await;
        }

        if let Some(member) = pick_member(&members) {
            return Ok(ResolvedRole::Member {
                company_id: member.company_id,
            });
        }

        Ok(ResolvedRole::None)
    }

    /// Resolution strictly within the hinted role. The hint is authoritative
    /// once accepted: no fallthrough to other role shapes.
    async fn resolve_hinted(
        &self,
        user_id: Uuid,
        kind: RoleKind,
        organization_id: Option<Uuid>,
    ) -> DomainResult<ResolvedRole> {
        match kind {
            RoleKind::Admin => {
                match self.memberships.admin_privilege(user_id).await? {
                    Some(privilege) => Ok(admin_role(privilege.is_distinguished())),
                    None => Ok(ResolvedRole::None),
                }
            }
            RoleKind::Association => {
                let managerships = self.memberships.active_managerships(user_id).await?;
                if let Some(managership) = select_managership(&managerships, organization_id) {
                    return self.association_role(managership.association_id).await;
                }
                // No manager membership at all: a platform admin may still
                // act as a given association without being its manager.
                if let Some(association_id) = organization_id {
                    if self.memberships.admin_privilege(user_id).await?.is_some() {
                        return self.association_role(association_id).await;
                    }
                }
                Ok(ResolvedRole::None)
            }
            RoleKind::Company => {
                let members = self.memberships.active_members(user_id).await?;
                let privileged: Vec<&MemberRecord> =
                    members.iter().filter(|m| m.is_company_privileged()).collect();
                match select_member(&privileged, organization_id) {
                    Some(member) => self.company_role(member).await,
                    None => Ok(ResolvedRole::None),
                }
            }
            RoleKind::Member => {
                let members = self.memberships.active_members(user_id).await?;
                match pick_member(&members) {
                    Some(member) => Ok(ResolvedRole::Member {
                        company_id: member.company_id,
                    }),
                    None => Ok(ResolvedRole::None),
                }
            }
        }
    }

    async fn association_role(&self, association_id: Uuid) -> DomainResult<ResolvedRole> {
        match self
            .organizations
            .find(OrgRef::association(association_id))
            .await?
        {
            Some(org) => Ok(ResolvedRole::Association {
                association_id,
                name: org.name,
            }),
            // Dangling membership row; nothing usable to scope a session to.
            None => Ok(ResolvedRole::None),
        }
    }

    async fn company_role(&self, member: &MemberRecord) -> DomainResult<ResolvedRole> {
        let company_id = match member.company_id {
            Some(id) => id,
            None => return Ok(ResolvedRole::None),
        };

        match self.organizations.find(OrgRef::company(company_id)).await? {
            Some(org) => Ok(ResolvedRole::Company {
                company_id,
                name: org.name,
                company_role: member.role,
            }),
            None => Ok(ResolvedRole::None),
        }
    }
}

fn admin_role(distinguished: bool) -> ResolvedRole {
    if distinguished {
        ResolvedRole::DistinguishedAdmin
    } else {
        ResolvedRole::PlatformAdmin
    }
}

/// Selects a managership by organization id, falling back to the first.
fn select_managership<'a>(
    managerships: &'a [AssociationManagerRecord],
    organization_id: Option<Uuid>,
) -> Option<&'a AssociationManagerRecord> {
    if let Some(id) = organization_id {
        if let Some(m) = managerships.iter().find(|m| m.association_id == id) {
            return Some(m);
        }
    }
    managerships.first()
}

/// Selects a member row by company id, falling back to the first.
fn select_member<'a>(
    members: &[&'a MemberRecord],
    organization_id: Option<Uuid>,
) -> Option<&'a MemberRecord> {
    if let Some(id) = organization_id {
        if let Some(m) = members.iter().find(|m| m.company_id == Some(id)) {
            return Some(m);
        }
    }
    members.first().copied()
}

/// Prefers a company-bound membership over a company-less baseline one.
fn pick_member(members: &[MemberRecord]) -> Option<&MemberRecord> {
    members
        .iter()
        .find(|m| m.company_id.is_some())
        .or_else(|| members.first())
}
