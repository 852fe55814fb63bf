//! Repository for membership database operations.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use domain::error::DomainResult;
use domain::models::{
    AdminPrivilege, AssociationManagerRecord, MemberRecord, NewAssociationManager, NewMember,
};
use domain::stores::MembershipStore;

use crate::entities::{AssociationManagerEntity, MemberEntity, PlatformAdminEntity};

use super::db_error;

/// Repository for member, association manager and platform admin rows.
#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for MembershipRepository {
    async fn insert_member(&self, input: NewMember) -> DomainResult<MemberRecord> {
        let entity = sqlx::query_as::<_, MemberEntity>(
            r#"
            INSERT INTO members (user_id, company_id, role, designation, department)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, company_id, role, designation, department, active, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(input.company_id)
        .bind(input.role.to_string())
        .bind(&input.designation)
        .bind(&input.department)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        entity.into_domain()
    }

    async fn delete_member(&self, id: Uuid) -> DomainResult<()> {
        // Hard delete; only ever called as saga compensation for a row this
        // process just inserted.
        sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn insert_association_manager(
        &self,
        input: NewAssociationManager,
    ) -> DomainResult<AssociationManagerRecord> {
        let entity = sqlx::query_as::<_, AssociationManagerEntity>(
            r#"
            INSERT INTO association_managers (user_id, association_id)
            VALUES ($1, $2)
            RETURNING id, user_id, association_id, active, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(input.association_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(entity.into_domain())
    }

    async fn delete_association_manager(&self, id: Uuid) -> DomainResult<()> {
        sqlx::query("DELETE FROM association_managers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn active_members(&self, user_id: Uuid) -> DomainResult<Vec<MemberRecord>> {
        let entities = sqlx::query_as::<_, MemberEntity>(
            r#"
            SELECT id, user_id, company_id, role, designation, department, active, created_at
            FROM members
            WHERE user_id = $1 AND active = true
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        entities.into_iter().map(MemberEntity::into_domain).collect()
    }

    async fn active_managerships(
        &self,
        user_id: Uuid,
    ) -> DomainResult<Vec<AssociationManagerRecord>> {
        let entities = sqlx::query_as::<_, AssociationManagerEntity>(
            r#"
            SELECT id, user_id, association_id, active, created_at
            FROM association_managers
            WHERE user_id = $1 AND active = true
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(entities
            .into_iter()
            .map(AssociationManagerEntity::into_domain)
            .collect())
    }

    async fn admin_privilege(&self, user_id: Uuid) -> DomainResult<Option<AdminPrivilege>> {
        let entity = sqlx::query_as::<_, PlatformAdminEntity>(
            r#"
            SELECT user_id, is_super, is_hidden, created_at
            FROM platform_admins
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(entity.map(PlatformAdminEntity::into_domain))
    }
}
