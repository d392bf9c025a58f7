//! Feature and direct-grant repository traits (ports)

use async_trait::async_trait;
use portal_shared::{FeatureId, UserId};

use crate::domain::{Feature, NewFeature, NewUserFeatureMapping, UserFeatureMapping};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeatureRepository: Send + Sync {
    async fn find_by_id(&self, id: FeatureId) -> Result<Option<Feature>, DomainError>;
    async fn find_by_permission(&self, permission: &str) -> Result<Option<Feature>, DomainError>;
    async fn list_all(&self) -> Result<Vec<Feature>, DomainError>;
    async fn list_by_ids(&self, ids: &[FeatureId]) -> Result<Vec<Feature>, DomainError>;
    async fn create(&self, feature: &NewFeature) -> Result<Feature, DomainError>;
    async fn update(&self, feature: &Feature) -> Result<Feature, DomainError>;
    async fn delete(&self, id: FeatureId) -> Result<(), DomainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserFeatureMappingRepository: Send + Sync {
    async fn create(
        &self,
        mapping: &NewUserFeatureMapping,
    ) -> Result<UserFeatureMapping, DomainError>;
    async fn create_many(
        &self,
        mappings: &[NewUserFeatureMapping],
    ) -> Result<Vec<UserFeatureMapping>, DomainError>;
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<UserFeatureMapping>, DomainError>;
    /// Idempotent: deleting an absent mapping succeeds.
    async fn delete(&self, user_id: UserId, feature_id: FeatureId) -> Result<(), DomainError>;
    async fn delete_all_for_user(&self, user_id: UserId) -> Result<u64, DomainError>;
}
