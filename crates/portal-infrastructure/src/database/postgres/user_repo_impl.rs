//! PostgreSQL user repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;

use portal_core::domain::{NewUser, User, UserType};
use portal_core::error::DomainError;
use portal_core::repositories::UserRepository;
use portal_shared::UserId;

use super::{db_error, is_unique_violation};

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct UserRow {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub mobile_number: String,
    pub country_id: Option<i32>,
    pub user_type: String,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            name: row.name,
            mobile_number: row.mobile_number,
            country_id: row.country_id,
            user_type: UserType::from_str(&row.user_type).unwrap_or(UserType::Client),
            is_active: row.is_active,
            last_login: row.last_login,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const USER_COLUMNS: &str = "id, email, name, mobile_number, country_id, user_type, \
                            is_active, last_login, created_at, updated_at";

/// Picks the conflict variant from the violated constraint's name; the
/// schema carries one unique index per column.
fn unique_conflict(constraint: &str, email: &str, mobile: &str) -> DomainError {
    if constraint.contains("mobile") {
        DomainError::MobileNumberAlreadyExists(mobile.to_string())
    } else {
        DomainError::EmailAlreadyExists(email.to_string())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("finding user by id", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding user by email", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_mobile_number(&self, mobile: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE mobile_number = $1"
        ))
        .bind(mobile)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding user by mobile number", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_all(&self) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("listing users", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let row: UserRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (email, name, mobile_number, country_id, user_type, is_active)
            VALUES ($1, $2, $3, $4, $5, true)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.mobile_number)
        .bind(user.country_id)
        .bind(user.user_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                let constraint = e
                    .as_database_error()
                    .and_then(|db| db.constraint())
                    .unwrap_or_default()
                    .to_string();
                unique_conflict(&constraint, &user.email, &user.mobile_number)
            } else {
                db_error("creating user", e)
            }
        })?;

        info!(user_id = row.id, "User created");
        Ok(row.into())
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let row: UserRow = sqlx::query_as(&format!(
            r#"
            UPDATE users
            SET email = $2,
                name = $3,
                mobile_number = $4,
                country_id = $5,
                user_type = $6,
                is_active = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.mobile_number)
        .bind(user.country_id)
        .bind(user.user_type.as_str())
        .bind(user.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                let constraint = e
                    .as_database_error()
                    .and_then(|db| db.constraint())
                    .unwrap_or_default()
                    .to_string();
                unique_conflict(&constraint, &user.email, &user.mobile_number)
            } else {
                db_error("updating user", e)
            }
        })?;

        Ok(row.into())
    }

    async fn update_last_login(&self, id: UserId, at: DateTime<Utc>) -> Result<(), DomainError> {
        sqlx::query("UPDATE users SET last_login = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("updating last login", e))?;

        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting user", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_conflict_distinguishes_indexes() {
        assert!(matches!(
            unique_conflict("idx_users_mobile_number", "alice@x.com", "1234567890"),
            DomainError::MobileNumberAlreadyExists(m) if m == "1234567890"
        ));
        assert!(matches!(
            unique_conflict("idx_users_email", "alice@x.com", "1234567890"),
            DomainError::EmailAlreadyExists(e) if e == "alice@x.com"
        ));
        // Unnamed constraint falls back to the email variant
        assert!(matches!(
            unique_conflict("", "alice@x.com", "1234567890"),
            DomainError::EmailAlreadyExists(_)
        ));
    }
}
