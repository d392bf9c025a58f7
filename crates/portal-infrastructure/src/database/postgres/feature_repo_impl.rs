//! PostgreSQL feature and direct-grant repositories

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use portal_core::domain::{Feature, NewFeature, NewUserFeatureMapping, UserFeatureMapping};
use portal_core::error::DomainError;
use portal_core::repositories::{FeatureRepository, UserFeatureMappingRepository};
use portal_shared::{FeatureId, UserId};

use super::{db_error, is_unique_violation};

pub struct PgFeatureRepository {
    pool: PgPool,
}

impl PgFeatureRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct FeatureRow {
    pub id: i32,
    pub name: String,
    pub permission: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FeatureRow> for Feature {
    fn from(row: FeatureRow) -> Self {
        Feature {
            id: row.id,
            name: row.name,
            permission: row.permission,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl FeatureRepository for PgFeatureRepository {
    async fn find_by_id(&self, id: FeatureId) -> Result<Option<Feature>, DomainError> {
        let row: Option<FeatureRow> = sqlx::query_as(
            "SELECT id, name, permission, created_at, updated_at FROM features WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding feature by id", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_permission(&self, permission: &str) -> Result<Option<Feature>, DomainError> {
        let row: Option<FeatureRow> = sqlx::query_as(
            "SELECT id, name, permission, created_at, updated_at FROM features WHERE permission = $1",
        )
        .bind(permission)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding feature by permission", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_all(&self) -> Result<Vec<Feature>, DomainError> {
        let rows: Vec<FeatureRow> = sqlx::query_as(
            "SELECT id, name, permission, created_at, updated_at FROM features ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing features", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn list_by_ids(&self, ids: &[FeatureId]) -> Result<Vec<Feature>, DomainError> {
        let rows: Vec<FeatureRow> = sqlx::query_as(
            r#"
            SELECT id, name, permission, created_at, updated_at
            FROM features
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing features by ids", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, feature: &NewFeature) -> Result<Feature, DomainError> {
        let row: FeatureRow = sqlx::query_as(
            r#"
            INSERT INTO features (name, permission)
            VALUES ($1, $2)
            RETURNING id, name, permission, created_at, updated_at
            "#,
        )
        .bind(&feature.name)
        .bind(&feature.permission)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::DuplicateGrant("feature permission".to_string())
            } else {
                db_error("creating feature", e)
            }
        })?;

        Ok(row.into())
    }

    async fn update(&self, feature: &Feature) -> Result<Feature, DomainError> {
        let row: FeatureRow = sqlx::query_as(
            r#"
            UPDATE features
            SET name = $2, permission = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, permission, created_at, updated_at
            "#,
        )
        .bind(feature.id)
        .bind(&feature.name)
        .bind(&feature.permission)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("updating feature", e))?;

        Ok(row.into())
    }

    async fn delete(&self, id: FeatureId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM features WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting feature", e))?;

        Ok(())
    }
}

pub struct PgUserFeatureMappingRepository {
    pool: PgPool,
}

impl PgUserFeatureMappingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserFeatureMappingRow {
    pub id: i64,
    pub user_id: i64,
    pub feature_id: i32,
}

impl From<UserFeatureMappingRow> for UserFeatureMapping {
    fn from(row: UserFeatureMappingRow) -> Self {
        UserFeatureMapping {
            id: row.id,
            user_id: row.user_id,
            feature_id: row.feature_id,
        }
    }
}

#[async_trait]
impl UserFeatureMappingRepository for PgUserFeatureMappingRepository {
    async fn create(
        &self,
        mapping: &NewUserFeatureMapping,
    ) -> Result<UserFeatureMapping, DomainError> {
        let row: UserFeatureMappingRow = sqlx::query_as(
            r#"
            INSERT INTO user_feature_mappings (user_id, feature_id)
            VALUES ($1, $2)
            RETURNING id, user_id, feature_id
            "#,
        )
        .bind(mapping.user_id)
        .bind(mapping.feature_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::DuplicateGrant("user-feature mapping".to_string())
            } else {
                db_error("creating user-feature mapping", e)
            }
        })?;

        Ok(row.into())
    }

    async fn create_many(
        &self,
        mappings: &[NewUserFeatureMapping],
    ) -> Result<Vec<UserFeatureMapping>, DomainError> {
        let mut created = Vec::with_capacity(mappings.len());
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("starting transaction", e))?;

        for mapping in mappings {
            let row: UserFeatureMappingRow = sqlx::query_as(
                r#"
                INSERT INTO user_feature_mappings (user_id, feature_id)
                VALUES ($1, $2)
                RETURNING id, user_id, feature_id
                "#,
            )
            .bind(mapping.user_id)
            .bind(mapping.feature_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::DuplicateGrant("user-feature mapping".to_string())
                } else {
                    db_error("creating user-feature mappings", e)
                }
            })?;
            created.push(row.into());
        }

        tx.commit()
            .await
            .map_err(|e| db_error("committing user-feature mappings", e))?;
        Ok(created)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<UserFeatureMapping>, DomainError> {
        let rows: Vec<UserFeatureMappingRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, feature_id
            FROM user_feature_mappings
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing direct grants", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn delete(&self, user_id: UserId, feature_id: FeatureId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM user_feature_mappings WHERE user_id = $1 AND feature_id = $2")
            .bind(user_id)
            .bind(feature_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting user-feature mapping", e))?;

        Ok(())
    }

    async fn delete_all_for_user(&self, user_id: UserId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM user_feature_mappings WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting direct grants", e))?;

        Ok(result.rows_affected())
    }
}
