//! Identity provisioning backed by the users and profiles tables.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use domain::error::{DomainError, DomainResult};
use domain::stores::{IdentityProvider, NewIdentity};
use shared::password;

use super::db_error;

/// Creates and deletes user accounts with their profile rows.
///
/// The user and profile inserts share one transaction, so a half-created
/// identity is never visible to the rest of the system.
#[derive(Clone)]
pub struct PgIdentityProvider {
    pool: PgPool,
}

impl PgIdentityProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn create_identity(&self, input: NewIdentity) -> DomainResult<Uuid> {
        let password_hash = password::hash_password(&input.password)
            .map_err(|err| DomainError::Dependency(format!("Password hashing failed: {}", err)))?;

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let user_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, password_hash, email_confirmed)
            VALUES (LOWER($1), $2, $3)
            RETURNING id
            "#,
        )
        .bind(&input.email)
        .bind(&password_hash)
        .bind(input.email_confirmed)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            if err
                .as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false)
            {
                DomainError::Conflict("Email already registered".to_string())
            } else {
                db_error(err)
            }
        })?;

        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, first_name, last_name)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        Ok(user_id)
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Uuid>> {
        sqlx::query_scalar("SELECT id FROM users WHERE email = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn delete_identity(&self, id: Uuid) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)
    }
}
