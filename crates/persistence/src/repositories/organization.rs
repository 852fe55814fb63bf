//! Repository for organization lookups.

use async_trait::async_trait;
use sqlx::PgPool;

use domain::error::DomainResult;
use domain::models::{OrgKind, OrgRef, OrganizationSummary};
use domain::stores::OrganizationStore;

use crate::entities::OrganizationEntity;

use super::db_error;

/// Read-only lookups across the companies and associations tables.
#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationStore for OrganizationRepository {
    async fn find(&self, organization: OrgRef) -> DomainResult<Option<OrganizationSummary>> {
        let query = match organization.kind {
            OrgKind::Company => {
                "SELECT id, name, active, created_at FROM companies WHERE id = $1 AND active = true"
            }
            OrgKind::Association => {
                "SELECT id, name, active, created_at FROM associations WHERE id = $1 AND active = true"
            }
        };

        let entity = sqlx::query_as::<_, OrganizationEntity>(query)
            .bind(organization.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(entity.map(|e| e.into_summary(organization.kind)))
    }
}
