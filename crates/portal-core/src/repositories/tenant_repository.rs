//! Tenant and membership repository traits (ports)

use async_trait::async_trait;
use portal_shared::{TenantId, UserId};

use crate::domain::{NewTenant, NewUserTenantMapping, Tenant, UserTenantMapping};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn find_by_id(&self, id: TenantId) -> Result<Option<Tenant>, DomainError>;
    async fn find_by_guid(&self, company_guid: &str) -> Result<Option<Tenant>, DomainError>;
    async fn find_by_company_name(&self, company_name: &str)
        -> Result<Option<Tenant>, DomainError>;
    async fn list_all(&self) -> Result<Vec<Tenant>, DomainError>;
    async fn list_by_ids(&self, ids: &[TenantId]) -> Result<Vec<Tenant>, DomainError>;
    async fn create(&self, tenant: &NewTenant) -> Result<Tenant, DomainError>;
    async fn update(&self, tenant: &Tenant) -> Result<Tenant, DomainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserTenantMappingRepository: Send + Sync {
    async fn create(
        &self,
        mapping: &NewUserTenantMapping,
    ) -> Result<UserTenantMapping, DomainError>;
    async fn create_many(
        &self,
        mappings: &[NewUserTenantMapping],
    ) -> Result<Vec<UserTenantMapping>, DomainError>;
    async fn exists(&self, user_id: UserId, tenant_id: TenantId) -> Result<bool, DomainError>;
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<UserTenantMapping>, DomainError>;
    /// Idempotent: deleting an absent mapping succeeds.
    async fn delete(&self, user_id: UserId, tenant_id: TenantId) -> Result<(), DomainError>;
}
