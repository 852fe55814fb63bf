//! Repository for the invitation audit trail.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use domain::error::DomainResult;
use domain::models::{AuditEntry, NewAuditEntry};
use domain::stores::AuditLog;

use crate::entities::AuditEntryEntity;

use super::db_error;

/// Append-only audit trail. Entries are never updated or deleted.
#[derive(Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLog for AuditLogRepository {
    async fn append(&self, entry: NewAuditEntry) -> DomainResult<AuditEntry> {
        let entity = sqlx::query_as::<_, AuditEntryEntity>(
            r#"
            INSERT INTO invitation_audit_entries (invitation_id, action, actor_id, note)
            VALUES ($1, $2, $3, $4)
            RETURNING id, invitation_id, action, actor_id, note, created_at
            "#,
        )
        .bind(entry.invitation_id)
        .bind(entry.action.to_string())
        .bind(entry.actor_id)
        .bind(&entry.note)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        entity.into_domain()
    }

    async fn entries_for(&self, invitation_id: Uuid) -> DomainResult<Vec<AuditEntry>> {
        let entities = sqlx::query_as::<_, AuditEntryEntity>(
            r#"
            SELECT id, invitation_id, action, actor_id, note, created_at
            FROM invitation_audit_entries
            WHERE invitation_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(invitation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        entities
            .into_iter()
            .map(AuditEntryEntity::into_domain)
            .collect()
    }
}
