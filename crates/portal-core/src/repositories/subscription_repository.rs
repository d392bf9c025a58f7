//! Subscription, plan composition, and history repository traits (ports)

use async_trait::async_trait;
use portal_shared::{FeatureId, SubscriptionId, UserId};

use crate::domain::{
    FeatureSubscriptionMapping, NewFeatureSubscriptionMapping, NewSubscription,
    NewUserSubscriptionHistory, NewUserSubscriptionMapping, Subscription, UserSubscriptionHistory,
    UserSubscriptionMapping,
};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn find_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>, DomainError>;
    async fn find_by_code(&self, code: &str) -> Result<Option<Subscription>, DomainError>;
    async fn list_all(&self) -> Result<Vec<Subscription>, DomainError>;
    async fn list_by_ids(&self, ids: &[SubscriptionId]) -> Result<Vec<Subscription>, DomainError>;
    async fn create(&self, subscription: &NewSubscription) -> Result<Subscription, DomainError>;
    async fn update(&self, subscription: &Subscription) -> Result<Subscription, DomainError>;
    async fn delete(&self, id: SubscriptionId) -> Result<(), DomainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserSubscriptionMappingRepository: Send + Sync {
    async fn create(
        &self,
        mapping: &NewUserSubscriptionMapping,
    ) -> Result<UserSubscriptionMapping, DomainError>;
    async fn list_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<UserSubscriptionMapping>, DomainError>;
    /// Idempotent: deleting an absent mapping succeeds.
    async fn delete(
        &self,
        user_id: UserId,
        subscription_id: SubscriptionId,
    ) -> Result<(), DomainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeatureSubscriptionMappingRepository: Send + Sync {
    async fn create(
        &self,
        mapping: &NewFeatureSubscriptionMapping,
    ) -> Result<FeatureSubscriptionMapping, DomainError>;
    async fn list_by_subscription(
        &self,
        subscription_id: SubscriptionId,
    ) -> Result<Vec<FeatureSubscriptionMapping>, DomainError>;
    async fn list_by_subscriptions(
        &self,
        subscription_ids: &[SubscriptionId],
    ) -> Result<Vec<FeatureSubscriptionMapping>, DomainError>;
    /// Idempotent: deleting an absent mapping succeeds.
    async fn delete(
        &self,
        feature_id: FeatureId,
        subscription_id: SubscriptionId,
    ) -> Result<(), DomainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionHistoryRepository: Send + Sync {
    /// Start date is set by the store at insert time.
    async fn create(
        &self,
        history: &NewUserSubscriptionHistory,
    ) -> Result<UserSubscriptionHistory, DomainError>;
    async fn find_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserSubscriptionHistory>, DomainError>;
    async fn list_all(&self) -> Result<Vec<UserSubscriptionHistory>, DomainError>;
    async fn update(
        &self,
        history: &UserSubscriptionHistory,
    ) -> Result<UserSubscriptionHistory, DomainError>;
    async fn delete_by_user(&self, user_id: UserId) -> Result<(), DomainError>;
}
