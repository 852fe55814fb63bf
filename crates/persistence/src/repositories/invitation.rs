//! Repository for invitation database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::error::{DomainError, DomainResult};
use domain::models::{Invitation, NewInvitation, OrgRef};
use domain::stores::InvitationStore;

use crate::entities::InvitationEntity;

use super::db_error;

/// Repository for invitation lifecycle operations.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvitationStore for InvitationRepository {
    async fn create(&self, input: NewInvitation) -> DomainResult<Invitation> {
        let entity = sqlx::query_as::<_, InvitationEntity>(
            r#"
            INSERT INTO invitations (email, first_name, last_name, organization_id,
                                     organization_kind, role, designation, department,
                                     token_digest, expires_at, invited_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, email, first_name, last_name, organization_id, organization_kind,
                      role, designation, department, token_digest, expires_at, status,
                      invited_by, accepted_at, accepted_by, created_at
            "#,
        )
        .bind(&input.email)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.organization.id)
        .bind(input.organization.kind.to_string())
        .bind(input.role.to_string())
        .bind(&input.designation)
        .bind(&input.department)
        .bind(&input.token_digest)
        .bind(input.expires_at)
        .bind(input.invited_by)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        entity.into_domain()
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Invitation>> {
        let entity = sqlx::query_as::<_, InvitationEntity>(
            r#"
            SELECT id, email, first_name, last_name, organization_id, organization_kind,
                   role, designation, department, token_digest, expires_at, status,
                   invited_by, accepted_at, accepted_by, created_at
            FROM invitations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        entity.map(InvitationEntity::into_domain).transpose()
    }

    async fn find_pending_by_digest(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<Invitation>> {
        let entity = sqlx::query_as::<_, InvitationEntity>(
            r#"
            SELECT id, email, first_name, last_name, organization_id, organization_kind,
                   role, designation, department, token_digest, expires_at, status,
                   invited_by, accepted_at, accepted_by, created_at
            FROM invitations
            WHERE token_digest = $1 AND status = 'pending' AND expires_at >= $2
            "#,
        )
        .bind(digest)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        entity.map(InvitationEntity::into_domain).transpose()
    }

    async fn rotate_secret(
        &self,
        id: Uuid,
        digest: &str,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<Invitation> {
        let entity = sqlx::query_as::<_, InvitationEntity>(
            r#"
            UPDATE invitations
            SET token_digest = $2, expires_at = $3, status = 'pending'
            WHERE id = $1 AND status <> 'accepted' AND status <> 'revoked'
            RETURNING id, email, first_name, last_name, organization_id, organization_kind,
                      role, designation, department, token_digest, expires_at, status,
                      invited_by, accepted_at, accepted_by, created_at
            "#,
        )
        .bind(id)
        .bind(digest)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        // The caller looked the row up just before this; no row here means a
        // concurrent transition to a terminal status, not a missing id.
        entity
            .ok_or_else(|| DomainError::Conflict("Invitation is no longer pending".to_string()))?
            .into_domain()
    }

    async fn mark_accepted(
        &self,
        id: Uuid,
        accepted_by: Uuid,
        now: DateTime<Utc>,
    ) -> DomainResult<bool> {
        // Single conditional update; the WHERE clause is the only thing that
        // serializes concurrent acceptors. Expiry is re-checked here so an
        // invitation that lapses between validation and commit cannot land.
        let result = sqlx::query(
            r#"
            UPDATE invitations
            SET status = 'accepted', accepted_at = $3, accepted_by = $2
            WHERE id = $1 AND status = 'pending' AND expires_at >= $3
            "#,
        )
        .bind(id)
        .bind(accepted_by)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_revoked(&self, id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE invitations
            SET status = 'revoked'
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_organization(&self, organization: OrgRef) -> DomainResult<Vec<Invitation>> {
        let entities = sqlx::query_as::<_, InvitationEntity>(
            r#"
            SELECT id, email, first_name, last_name, organization_id, organization_kind,
                   role, designation, department, token_digest, expires_at, status,
                   invited_by, accepted_at, accepted_by, created_at
            FROM invitations
            WHERE organization_id = $1 AND organization_kind = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(organization.id)
        .bind(organization.kind.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        entities
            .into_iter()
            .map(InvitationEntity::into_domain)
            .collect()
    }
}
