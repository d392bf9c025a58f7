//! Tenant resolution and membership management

use std::sync::Arc;

use tracing::{info, warn};

use portal_shared::{TenantId, UserId};

use crate::domain::{NewTenant, NewUserTenantMapping, Tenant, TenantInfo, UserTenantMapping};
use crate::error::DomainError;
use crate::repositories::{TenantRepository, UserTenantMappingRepository};

/// Partial update; absent fields keep their stored values. The company
/// GUID is immutable and cannot be updated.
#[derive(Debug, Clone, Default)]
pub struct TenantUpdate {
    pub company_name: Option<String>,
    pub host: Option<String>,
    pub bmrm_port: Option<i32>,
    pub sg_biz_port: Option<i32>,
    pub tally_sync_port: Option<i32>,
}

pub struct TenantService {
    tenants: Arc<dyn TenantRepository>,
    mappings: Arc<dyn UserTenantMappingRepository>,
}

impl TenantService {
    pub fn new(
        tenants: Arc<dyn TenantRepository>,
        mappings: Arc<dyn UserTenantMappingRepository>,
    ) -> Self {
        Self { tenants, mappings }
    }

    /// Resolves a company GUID to an authorized tenant for the given user.
    ///
    /// Two-step existence check: the tenant must exist AND a membership
    /// row must exist. A tenant without membership is rejected, never
    /// defaulted.
    pub async fn resolve_tenant(
        &self,
        user_id: UserId,
        company_guid: &str,
    ) -> Result<TenantInfo, DomainError> {
        let tenant = self
            .tenants
            .find_by_guid(company_guid)
            .await?
            .ok_or_else(|| {
                warn!(user_id, company_guid, "Tenant resolution failed: unknown GUID");
                DomainError::UnknownTenant(company_guid.to_string())
            })?;

        if !self.mappings.exists(user_id, tenant.id).await? {
            warn!(
                user_id,
                tenant_id = tenant.id,
                "Tenant resolution failed: user is not a member"
            );
            return Err(DomainError::NotAMember {
                user_id,
                tenant_id: tenant.id,
            });
        }

        Ok(TenantInfo { user_id, tenant })
    }

    /// All tenants the user is mapped into.
    pub async fn tenants_for_user(&self, user_id: UserId) -> Result<Vec<Tenant>, DomainError> {
        let mappings = self.mappings.list_by_user(user_id).await?;
        if mappings.is_empty() {
            return Ok(Vec::new());
        }
        let tenant_ids: Vec<TenantId> = mappings.iter().map(|m| m.tenant_id).collect();
        self.tenants.list_by_ids(&tenant_ids).await
    }

    pub async fn create_tenant(&self, tenant: &NewTenant) -> Result<Tenant, DomainError> {
        let created = self.tenants.create(tenant).await?;
        info!(tenant_id = created.id, "Tenant created");
        Ok(created)
    }

    pub async fn update_tenant(
        &self,
        id: TenantId,
        update: &TenantUpdate,
    ) -> Result<Tenant, DomainError> {
        let mut tenant = self
            .tenants
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::UnknownTenant(id.to_string()))?;
        if let Some(company_name) = &update.company_name {
            tenant.company_name = company_name.clone();
        }
        if let Some(host) = &update.host {
            tenant.host = host.clone();
        }
        if let Some(port) = update.bmrm_port {
            tenant.bmrm_port = port;
        }
        if let Some(port) = update.sg_biz_port {
            tenant.sg_biz_port = port;
        }
        if let Some(port) = update.tally_sync_port {
            tenant.tally_sync_port = port;
        }
        self.tenants.update(&tenant).await
    }

    pub async fn list_tenants(&self) -> Result<Vec<Tenant>, DomainError> {
        self.tenants.list_all().await
    }

    pub async fn map_user_to_tenant(
        &self,
        mapping: &NewUserTenantMapping,
    ) -> Result<UserTenantMapping, DomainError> {
        self.mappings.create(mapping).await
    }

    pub async fn map_users_to_tenant(
        &self,
        mappings: &[NewUserTenantMapping],
    ) -> Result<Vec<UserTenantMapping>, DomainError> {
        self.mappings.create_many(mappings).await
    }

    pub async fn unmap_user_from_tenant(
        &self,
        user_id: UserId,
        tenant_id: TenantId,
    ) -> Result<(), DomainError> {
        self.mappings.delete(user_id, tenant_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::repositories::tenant_repository::{
        MockTenantRepository, MockUserTenantMappingRepository,
    };

    fn tenant(id: i64, guid: &str) -> Tenant {
        Tenant {
            id,
            company_guid: guid.to_string(),
            company_name: "Acme".to_string(),
            host: "localhost".to_string(),
            bmrm_port: 9000,
            sg_biz_port: 9001,
            tally_sync_port: 9002,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_resolve_tenant_succeeds_for_member() {
        let mut tenants = MockTenantRepository::new();
        tenants
            .expect_find_by_guid()
            .returning(|guid| Ok(Some(tenant(5, guid))));
        let mut mappings = MockUserTenantMappingRepository::new();
        mappings
            .expect_exists()
            .withf(|user_id, tenant_id| *user_id == 1 && *tenant_id == 5)
            .returning(|_, _| Ok(true));

        let service = TenantService::new(Arc::new(tenants), Arc::new(mappings));
        let info = service.resolve_tenant(1, "guid-5").await.unwrap();
        assert_eq!(info.user_id, 1);
        assert_eq!(info.tenant.id, 5);
    }

    #[tokio::test]
    async fn test_resolve_tenant_unknown_guid() {
        let mut tenants = MockTenantRepository::new();
        tenants.expect_find_by_guid().returning(|_| Ok(None));

        let service = TenantService::new(
            Arc::new(tenants),
            Arc::new(MockUserTenantMappingRepository::new()),
        );
        let err = service.resolve_tenant(1, "nope").await.unwrap_err();
        assert!(matches!(err, DomainError::UnknownTenant(_)));
    }

    #[tokio::test]
    async fn test_resolve_tenant_rejects_non_member() {
        let mut tenants = MockTenantRepository::new();
        tenants
            .expect_find_by_guid()
            .returning(|guid| Ok(Some(tenant(5, guid))));
        let mut mappings = MockUserTenantMappingRepository::new();
        mappings.expect_exists().returning(|_, _| Ok(false));

        let service = TenantService::new(Arc::new(tenants), Arc::new(mappings));
        let err = service.resolve_tenant(1, "guid-5").await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotAMember {
                user_id: 1,
                tenant_id: 5
            }
        ));
    }

    #[tokio::test]
    async fn test_tenants_for_user_empty_without_mappings() {
        let mut mappings = MockUserTenantMappingRepository::new();
        mappings.expect_list_by_user().returning(|_| Ok(Vec::new()));

        let service = TenantService::new(Arc::new(MockTenantRepository::new()), Arc::new(mappings));
        assert!(service.tenants_for_user(1).await.unwrap().is_empty());
    }
}
