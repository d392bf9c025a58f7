//! PostgreSQL subscription, plan composition, and history repositories

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use portal_core::domain::{
    FeatureSubscriptionMapping, NewFeatureSubscriptionMapping, NewSubscription,
    NewUserSubscriptionHistory, NewUserSubscriptionMapping, Subscription, UserSubscriptionHistory,
    UserSubscriptionMapping,
};
use portal_core::error::DomainError;
use portal_core::repositories::{
    FeatureSubscriptionMappingRepository, SubscriptionHistoryRepository, SubscriptionRepository,
    UserSubscriptionMappingRepository,
};
use portal_shared::{FeatureId, SubscriptionId, UserId};

use super::{db_error, is_unique_violation};

pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SubscriptionRow {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        Subscription {
            id: row.id,
            name: row.name,
            code: row.code,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn find_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            "SELECT id, name, code, created_at, updated_at FROM subscriptions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding subscription by id", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            "SELECT id, name, code, created_at, updated_at FROM subscriptions WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding subscription by code", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_all(&self) -> Result<Vec<Subscription>, DomainError> {
        let rows: Vec<SubscriptionRow> = sqlx::query_as(
            "SELECT id, name, code, created_at, updated_at FROM subscriptions ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing subscriptions", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn list_by_ids(&self, ids: &[SubscriptionId]) -> Result<Vec<Subscription>, DomainError> {
        let rows: Vec<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT id, name, code, created_at, updated_at
            FROM subscriptions
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing subscriptions by ids", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, subscription: &NewSubscription) -> Result<Subscription, DomainError> {
        let row: SubscriptionRow = sqlx::query_as(
            r#"
            INSERT INTO subscriptions (name, code)
            VALUES ($1, $2)
            RETURNING id, name, code, created_at, updated_at
            "#,
        )
        .bind(&subscription.name)
        .bind(&subscription.code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::DuplicateGrant("subscription code".to_string())
            } else {
                db_error("creating subscription", e)
            }
        })?;

        Ok(row.into())
    }

    async fn update(&self, subscription: &Subscription) -> Result<Subscription, DomainError> {
        let row: SubscriptionRow = sqlx::query_as(
            r#"
            UPDATE subscriptions
            SET name = $2, code = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, code, created_at, updated_at
            "#,
        )
        .bind(subscription.id)
        .bind(&subscription.name)
        .bind(&subscription.code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("updating subscription", e))?;

        Ok(row.into())
    }

    async fn delete(&self, id: SubscriptionId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting subscription", e))?;

        Ok(())
    }
}

pub struct PgUserSubscriptionMappingRepository {
    pool: PgPool,
}

impl PgUserSubscriptionMappingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserSubscriptionMappingRow {
    pub id: i64,
    pub user_id: i64,
    pub subscription_id: i32,
}

impl From<UserSubscriptionMappingRow> for UserSubscriptionMapping {
    fn from(row: UserSubscriptionMappingRow) -> Self {
        UserSubscriptionMapping {
            id: row.id,
            user_id: row.user_id,
            subscription_id: row.subscription_id,
        }
    }
}

#[async_trait]
impl UserSubscriptionMappingRepository for PgUserSubscriptionMappingRepository {
    async fn create(
        &self,
        mapping: &NewUserSubscriptionMapping,
    ) -> Result<UserSubscriptionMapping, DomainError> {
        let row: UserSubscriptionMappingRow = sqlx::query_as(
            r#"
            INSERT INTO user_subscription_mappings (user_id, subscription_id)
            VALUES ($1, $2)
            RETURNING id, user_id, subscription_id
            "#,
        )
        .bind(mapping.user_id)
        .bind(mapping.subscription_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::DuplicateGrant("user-subscription mapping".to_string())
            } else {
                db_error("creating user-subscription mapping", e)
            }
        })?;

        Ok(row.into())
    }

    async fn list_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<UserSubscriptionMapping>, DomainError> {
        let rows: Vec<UserSubscriptionMappingRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, subscription_id
            FROM user_subscription_mappings
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing user subscriptions", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn delete(
        &self,
        user_id: UserId,
        subscription_id: SubscriptionId,
    ) -> Result<(), DomainError> {
        sqlx::query(
            "DELETE FROM user_subscription_mappings WHERE user_id = $1 AND subscription_id = $2",
        )
        .bind(user_id)
        .bind(subscription_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("deleting user-subscription mapping", e))?;

        Ok(())
    }
}

pub struct PgFeatureSubscriptionMappingRepository {
    pool: PgPool,
}

impl PgFeatureSubscriptionMappingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct FeatureSubscriptionMappingRow {
    pub id: i64,
    pub feature_id: i32,
    pub subscription_id: i32,
}

impl From<FeatureSubscriptionMappingRow> for FeatureSubscriptionMapping {
    fn from(row: FeatureSubscriptionMappingRow) -> Self {
        FeatureSubscriptionMapping {
            id: row.id,
            feature_id: row.feature_id,
            subscription_id: row.subscription_id,
        }
    }
}

#[async_trait]
impl FeatureSubscriptionMappingRepository for PgFeatureSubscriptionMappingRepository {
    async fn create(
        &self,
        mapping: &NewFeatureSubscriptionMapping,
    ) -> Result<FeatureSubscriptionMapping, DomainError> {
        let row: FeatureSubscriptionMappingRow = sqlx::query_as(
            r#"
            INSERT INTO feature_subscription_mappings (feature_id, subscription_id)
            VALUES ($1, $2)
            RETURNING id, feature_id, subscription_id
            "#,
        )
        .bind(mapping.feature_id)
        .bind(mapping.subscription_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::DuplicateGrant("feature-subscription mapping".to_string())
            } else {
                db_error("creating feature-subscription mapping", e)
            }
        })?;

        Ok(row.into())
    }

    async fn list_by_subscription(
        &self,
        subscription_id: SubscriptionId,
    ) -> Result<Vec<FeatureSubscriptionMapping>, DomainError> {
        let rows: Vec<FeatureSubscriptionMappingRow> = sqlx::query_as(
            r#"
            SELECT id, feature_id, subscription_id
            FROM feature_subscription_mappings
            WHERE subscription_id = $1
            ORDER BY id
            "#,
        )
        .bind(subscription_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing plan features", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn list_by_subscriptions(
        &self,
        subscription_ids: &[SubscriptionId],
    ) -> Result<Vec<FeatureSubscriptionMapping>, DomainError> {
        let rows: Vec<FeatureSubscriptionMappingRow> = sqlx::query_as(
            r#"
            SELECT id, feature_id, subscription_id
            FROM feature_subscription_mappings
            WHERE subscription_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(subscription_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing plan features", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn delete(
        &self,
        feature_id: FeatureId,
        subscription_id: SubscriptionId,
    ) -> Result<(), DomainError> {
        sqlx::query(
            "DELETE FROM feature_subscription_mappings WHERE feature_id = $1 AND subscription_id = $2",
        )
        .bind(feature_id)
        .bind(subscription_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("deleting feature-subscription mapping", e))?;

        Ok(())
    }
}

pub struct PgSubscriptionHistoryRepository {
    pool: PgPool,
}

impl PgSubscriptionHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SubscriptionHistoryRow {
    pub id: i64,
    pub user_id: i64,
    pub subscription_id: i32,
    pub start_date: DateTime<Utc>,
    pub renewal_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub number_of_renewals: i16,
}

impl From<SubscriptionHistoryRow> for UserSubscriptionHistory {
    fn from(row: SubscriptionHistoryRow) -> Self {
        UserSubscriptionHistory {
            id: row.id,
            user_id: row.user_id,
            subscription_id: row.subscription_id,
            start_date: row.start_date,
            renewal_date: row.renewal_date,
            expiry_date: row.expiry_date,
            number_of_renewals: row.number_of_renewals,
        }
    }
}

const HISTORY_COLUMNS: &str = "id, user_id, subscription_id, start_date, renewal_date, \
                               expiry_date, number_of_renewals";

#[async_trait]
impl SubscriptionHistoryRepository for PgSubscriptionHistoryRepository {
    async fn create(
        &self,
        history: &NewUserSubscriptionHistory,
    ) -> Result<UserSubscriptionHistory, DomainError> {
        let row: SubscriptionHistoryRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO user_subscription_histories
                (user_id, subscription_id, start_date, renewal_date, expiry_date, number_of_renewals)
            VALUES ($1, $2, NOW(), $3, $4, 0)
            RETURNING {HISTORY_COLUMNS}
            "#
        ))
        .bind(history.user_id)
        .bind(history.subscription_id)
        .bind(history.renewal_date)
        .bind(history.expiry_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::DuplicateGrant("subscription history".to_string())
            } else {
                db_error("creating subscription history", e)
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserSubscriptionHistory>, DomainError> {
        let row: Option<SubscriptionHistoryRow> = sqlx::query_as(&format!(
            "SELECT {HISTORY_COLUMNS} FROM user_subscription_histories WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding subscription history", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_all(&self) -> Result<Vec<UserSubscriptionHistory>, DomainError> {
        let rows: Vec<SubscriptionHistoryRow> = sqlx::query_as(&format!(
            "SELECT {HISTORY_COLUMNS} FROM user_subscription_histories ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing subscription histories", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn update(
        &self,
        history: &UserSubscriptionHistory,
    ) -> Result<UserSubscriptionHistory, DomainError> {
        let row: SubscriptionHistoryRow = sqlx::query_as(&format!(
            r#"
            UPDATE user_subscription_histories
            SET subscription_id = $2,
                renewal_date = $3,
                expiry_date = $4,
                number_of_renewals = $5
            WHERE id = $1
            RETURNING {HISTORY_COLUMNS}
            "#
        ))
        .bind(history.id)
        .bind(history.subscription_id)
        .bind(history.renewal_date)
        .bind(history.expiry_date)
        .bind(history.number_of_renewals)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("updating subscription history", e))?;

        Ok(row.into())
    }

    async fn delete_by_user(&self, user_id: UserId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM user_subscription_histories WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting subscription history", e))?;

        Ok(())
    }
}
