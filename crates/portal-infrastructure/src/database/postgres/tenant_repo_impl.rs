//! PostgreSQL tenant and membership repositories

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;

use portal_core::domain::{NewTenant, NewUserTenantMapping, Tenant, UserTenantMapping};
use portal_core::error::DomainError;
use portal_core::repositories::{TenantRepository, UserTenantMappingRepository};
use portal_shared::{TenantId, UserId};

use super::{db_error, is_unique_violation};

pub struct PgTenantRepository {
    pool: PgPool,
}

impl PgTenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TenantRow {
    pub id: i64,
    pub company_guid: String,
    pub company_name: String,
    pub host: String,
    pub bmrm_port: i32,
    pub sg_biz_port: i32,
    pub tally_sync_port: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Tenant {
            id: row.id,
            company_guid: row.company_guid,
            company_name: row.company_name,
            host: row.host,
            bmrm_port: row.bmrm_port,
            sg_biz_port: row.sg_biz_port,
            tally_sync_port: row.tally_sync_port,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const TENANT_COLUMNS: &str = "id, company_guid, company_name, host, bmrm_port, \
                              sg_biz_port, tally_sync_port, created_at, updated_at";

#[async_trait]
impl TenantRepository for PgTenantRepository {
    async fn find_by_id(&self, id: TenantId) -> Result<Option<Tenant>, DomainError> {
        let row: Option<TenantRow> =
            sqlx::query_as(&format!("SELECT {TENANT_COLUMNS} FROM tenants WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("finding tenant by id", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_guid(&self, company_guid: &str) -> Result<Option<Tenant>, DomainError> {
        let row: Option<TenantRow> = sqlx::query_as(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE company_guid = $1"
        ))
        .bind(company_guid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding tenant by guid", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_company_name(
        &self,
        company_name: &str,
    ) -> Result<Option<Tenant>, DomainError> {
        let row: Option<TenantRow> = sqlx::query_as(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE company_name = $1"
        ))
        .bind(company_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding tenant by company name", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_all(&self) -> Result<Vec<Tenant>, DomainError> {
        let rows: Vec<TenantRow> =
            sqlx::query_as(&format!("SELECT {TENANT_COLUMNS} FROM tenants ORDER BY id"))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("listing tenants", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn list_by_ids(&self, ids: &[TenantId]) -> Result<Vec<Tenant>, DomainError> {
        let rows: Vec<TenantRow> = sqlx::query_as(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE id = ANY($1) ORDER BY id"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing tenants by ids", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, tenant: &NewTenant) -> Result<Tenant, DomainError> {
        let row: TenantRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO tenants (company_guid, company_name, host, bmrm_port, sg_biz_port, tally_sync_port)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TENANT_COLUMNS}
            "#
        ))
        .bind(&tenant.company_guid)
        .bind(&tenant.company_name)
        .bind(&tenant.host)
        .bind(tenant.bmrm_port)
        .bind(tenant.sg_biz_port)
        .bind(tenant.tally_sync_port)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::TenantGuidAlreadyExists(tenant.company_guid.clone())
            } else {
                db_error("creating tenant", e)
            }
        })?;

        info!(tenant_id = row.id, "Tenant created");
        Ok(row.into())
    }

    async fn update(&self, tenant: &Tenant) -> Result<Tenant, DomainError> {
        let row: TenantRow = sqlx::query_as(&format!(
            r#"
            UPDATE tenants
            SET company_name = $2,
                host = $3,
                bmrm_port = $4,
                sg_biz_port = $5,
                tally_sync_port = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TENANT_COLUMNS}
            "#
        ))
        .bind(tenant.id)
        .bind(&tenant.company_name)
        .bind(&tenant.host)
        .bind(tenant.bmrm_port)
        .bind(tenant.sg_biz_port)
        .bind(tenant.tally_sync_port)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("updating tenant", e))?;

        Ok(row.into())
    }
}

pub struct PgUserTenantMappingRepository {
    pool: PgPool,
}

impl PgUserTenantMappingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserTenantMappingRow {
    pub id: i64,
    pub user_id: i64,
    pub tenant_id: i64,
}

impl From<UserTenantMappingRow> for UserTenantMapping {
    fn from(row: UserTenantMappingRow) -> Self {
        UserTenantMapping {
            id: row.id,
            user_id: row.user_id,
            tenant_id: row.tenant_id,
        }
    }
}

#[async_trait]
impl UserTenantMappingRepository for PgUserTenantMappingRepository {
    async fn create(
        &self,
        mapping: &NewUserTenantMapping,
    ) -> Result<UserTenantMapping, DomainError> {
        let row: UserTenantMappingRow = sqlx::query_as(
            r#"
            INSERT INTO user_tenant_mappings (user_id, tenant_id)
            VALUES ($1, $2)
            RETURNING id, user_id, tenant_id
            "#,
        )
        .bind(mapping.user_id)
        .bind(mapping.tenant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::DuplicateGrant("user-tenant mapping".to_string())
            } else {
                db_error("creating user-tenant mapping", e)
            }
        })?;

        Ok(row.into())
    }

    async fn create_many(
        &self,
        mappings: &[NewUserTenantMapping],
    ) -> Result<Vec<UserTenantMapping>, DomainError> {
        let mut created = Vec::with_capacity(mappings.len());
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("starting transaction", e))?;

        for mapping in mappings {
            let row: UserTenantMappingRow = sqlx::query_as(
                r#"
                INSERT INTO user_tenant_mappings (user_id, tenant_id)
                VALUES ($1, $2)
                RETURNING id, user_id, tenant_id
                "#,
            )
            .bind(mapping.user_id)
            .bind(mapping.tenant_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::DuplicateGrant("user-tenant mapping".to_string())
                } else {
                    db_error("creating user-tenant mappings", e)
                }
            })?;
            created.push(row.into());
        }

        tx.commit()
            .await
            .map_err(|e| db_error("committing user-tenant mappings", e))?;
        Ok(created)
    }

    async fn exists(&self, user_id: UserId, tenant_id: TenantId) -> Result<bool, DomainError> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM user_tenant_mappings
                WHERE user_id = $1 AND tenant_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("checking tenant membership", e))?;

        Ok(exists.0)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<UserTenantMapping>, DomainError> {
        let rows: Vec<UserTenantMappingRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, tenant_id
            FROM user_tenant_mappings
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing tenant memberships", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn delete(&self, user_id: UserId, tenant_id: TenantId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM user_tenant_mappings WHERE user_id = $1 AND tenant_id = $2")
            .bind(user_id)
            .bind(tenant_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting user-tenant mapping", e))?;

        Ok(())
    }
}
