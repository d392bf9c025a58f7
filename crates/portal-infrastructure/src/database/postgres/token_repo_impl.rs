//! PostgreSQL token repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use portal_core::domain::{NewToken, Token};
use portal_core::error::DomainError;
use portal_core::repositories::TokenRepository;

use super::db_error;

pub struct PgTokenRepository {
    pool: PgPool,
}

impl PgTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TokenRow {
    pub id: i64,
    pub user_id: i64,
    pub value: Uuid,
    pub expiry: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TokenRow> for Token {
    fn from(row: TokenRow) -> Self {
        Token {
            id: row.id,
            user_id: row.user_id,
            value: row.value,
            expiry: row.expiry,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn create(&self, token: &NewToken) -> Result<Token, DomainError> {
        let row: TokenRow = sqlx::query_as(
            r#"
            INSERT INTO tokens (user_id, value, expiry)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, value, expiry, created_at, updated_at
            "#,
        )
        .bind(token.user_id)
        .bind(token.value)
        .bind(token.expiry)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("creating token", e))?;

        Ok(row.into())
    }

    async fn find_by_value(&self, value: Uuid) -> Result<Option<Token>, DomainError> {
        let row: Option<TokenRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, value, expiry, created_at, updated_at
            FROM tokens
            WHERE value = $1
            "#,
        )
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding token by value", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn delete_expired(&self) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM tokens WHERE expiry <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting expired tokens", e))?;

        Ok(result.rows_affected())
    }
}
