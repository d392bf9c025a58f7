//! PostgreSQL credential repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use portal_core::domain::{NewUserCredential, UserCredential};
use portal_core::error::DomainError;
use portal_core::repositories::CredentialRepository;
use portal_shared::UserId;

use super::{db_error, is_unique_violation};

pub struct PgCredentialRepository {
    pool: PgPool,
}

impl PgCredentialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CredentialRow {
    pub id: i64,
    pub user_id: i64,
    pub password_hash: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CredentialRow> for UserCredential {
    fn from(row: CredentialRow) -> Self {
        UserCredential {
            id: row.id,
            user_id: row.user_id,
            password_hash: row.password_hash,
            salt: row.salt,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl CredentialRepository for PgCredentialRepository {
    async fn find_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserCredential>, DomainError> {
        let row: Option<CredentialRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, password_hash, salt, created_at, updated_at
            FROM user_credentials
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding credential by user id", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(&self, credential: &NewUserCredential) -> Result<UserCredential, DomainError> {
        let row: CredentialRow = sqlx::query_as(
            r#"
            INSERT INTO user_credentials (user_id, password_hash, salt)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, password_hash, salt, created_at, updated_at
            "#,
        )
        .bind(credential.user_id)
        .bind(&credential.password_hash)
        .bind(&credential.salt)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::DuplicateGrant("user credential".to_string())
            } else {
                db_error("creating credential", e)
            }
        })?;

        Ok(row.into())
    }

    async fn update_password(
        &self,
        user_id: UserId,
        password_hash: &str,
        salt: &str,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE user_credentials
            SET password_hash = $2, salt = $3, updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(password_hash)
        .bind(salt)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("updating password", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::InvalidCredentials);
        }
        Ok(())
    }
}
