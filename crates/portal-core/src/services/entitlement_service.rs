//! Entitlement graph
//!
//! Resolves the features a user may use, both directly granted and
//! reachable through subscription plans. Both paths are additive and a
//! feature appears once regardless of how many paths grant it.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::info;

use portal_shared::{FeatureId, SubscriptionId, UserId};

use crate::domain::{
    Feature, FeatureSubscriptionMapping, NewFeature, NewFeatureSubscriptionMapping,
    NewSubscription, NewUserFeatureMapping, NewUserSubscriptionHistory, NewUserSubscriptionMapping,
    Subscription, UserFeatureMapping, UserSubscriptionHistory, UserSubscriptionMapping,
};
use crate::error::DomainError;
use crate::repositories::{
    FeatureRepository, FeatureSubscriptionMappingRepository, SubscriptionHistoryRepository,
    SubscriptionRepository, UserFeatureMappingRepository, UserSubscriptionMappingRepository,
};

/// Partial update for a feature; absent fields keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct FeatureUpdate {
    pub name: Option<String>,
    pub permission: Option<String>,
}

/// Partial update for a subscription; absent fields keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionUpdate {
    pub name: Option<String>,
    pub code: Option<String>,
}

pub struct EntitlementService {
    features: Arc<dyn FeatureRepository>,
    user_features: Arc<dyn UserFeatureMappingRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    user_subscriptions: Arc<dyn UserSubscriptionMappingRepository>,
    feature_subscriptions: Arc<dyn FeatureSubscriptionMappingRepository>,
    history: Arc<dyn SubscriptionHistoryRepository>,
}

impl EntitlementService {
    pub fn new(
        features: Arc<dyn FeatureRepository>,
        user_features: Arc<dyn UserFeatureMappingRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        user_subscriptions: Arc<dyn UserSubscriptionMappingRepository>,
        feature_subscriptions: Arc<dyn FeatureSubscriptionMappingRepository>,
        history: Arc<dyn SubscriptionHistoryRepository>,
    ) -> Self {
        Self {
            features,
            user_features,
            subscriptions,
            user_subscriptions,
            feature_subscriptions,
            history,
        }
    }

    /// Union of directly granted features and features bundled into any
    /// subscription the user holds.
    pub async fn features_for_user(&self, user_id: UserId) -> Result<Vec<Feature>, DomainError> {
        let mut feature_ids: BTreeSet<FeatureId> = self
            .user_features
            .list_by_user(user_id)
            .await?
            .iter()
            .map(|m| m.feature_id)
            .collect();

        let subscription_ids: Vec<SubscriptionId> = self
            .user_subscriptions
            .list_by_user(user_id)
            .await?
            .iter()
            .map(|m| m.subscription_id)
            .collect();

        if !subscription_ids.is_empty() {
            for mapping in self
                .feature_subscriptions
                .list_by_subscriptions(&subscription_ids)
                .await?
            {
                feature_ids.insert(mapping.feature_id);
            }
        }

        if feature_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<FeatureId> = feature_ids.into_iter().collect();
        self.features.list_by_ids(&ids).await
    }

    /// Grants a feature directly to a user. A duplicate (user, feature)
    /// pair is rejected as `DuplicateGrant`, never silently ignored.
    pub async fn grant_feature_direct(
        &self,
        user_id: UserId,
        feature_id: FeatureId,
    ) -> Result<UserFeatureMapping, DomainError> {
        let mapping = self
            .user_features
            .create(&NewUserFeatureMapping { user_id, feature_id })
            .await?;
        info!(user_id, feature_id, "Feature granted directly");
        Ok(mapping)
    }

    /// Resolves permission codes to features and grants each directly.
    pub async fn grant_features_by_permission(
        &self,
        user_id: UserId,
        permissions: &[&str],
    ) -> Result<Vec<UserFeatureMapping>, DomainError> {
        let mut granted = Vec::with_capacity(permissions.len());
        for permission in permissions {
            let feature = self
                .features
                .find_by_permission(permission)
                .await?
                .ok_or(DomainError::FeatureNotFound)?;
            granted.push(self.grant_feature_direct(user_id, feature.id).await?);
        }
        Ok(granted)
    }

    /// Revokes a direct grant; revoking an absent mapping is not an error.
    pub async fn revoke_feature_direct(
        &self,
        user_id: UserId,
        feature_id: FeatureId,
    ) -> Result<(), DomainError> {
        self.user_features.delete(user_id, feature_id).await
    }

    pub async fn revoke_all_for_user(&self, user_id: UserId) -> Result<u64, DomainError> {
        let revoked = self.user_features.delete_all_for_user(user_id).await?;
        info!(user_id, revoked, "All direct grants revoked");
        Ok(revoked)
    }

    pub async fn grant_features_direct_many(
        &self,
        mappings: &[NewUserFeatureMapping],
    ) -> Result<Vec<UserFeatureMapping>, DomainError> {
        self.user_features.create_many(mappings).await
    }

    pub async fn map_feature_to_subscription(
        &self,
        mapping: &NewFeatureSubscriptionMapping,
    ) -> Result<FeatureSubscriptionMapping, DomainError> {
        self.feature_subscriptions.create(mapping).await
    }

    pub async fn unmap_feature_from_subscription(
        &self,
        feature_id: FeatureId,
        subscription_id: SubscriptionId,
    ) -> Result<(), DomainError> {
        self.feature_subscriptions
            .delete(feature_id, subscription_id)
            .await
    }

    pub async fn map_user_to_subscription(
        &self,
        mapping: &NewUserSubscriptionMapping,
    ) -> Result<UserSubscriptionMapping, DomainError> {
        self.user_subscriptions.create(mapping).await
    }

    pub async fn unmap_user_from_subscription(
        &self,
        user_id: UserId,
        subscription_id: SubscriptionId,
    ) -> Result<(), DomainError> {
        self.user_subscriptions.delete(user_id, subscription_id).await
    }

    /// Features bundled into a subscription plan.
    pub async fn features_for_subscription(
        &self,
        subscription_id: SubscriptionId,
    ) -> Result<Vec<Feature>, DomainError> {
        let mappings = self
            .feature_subscriptions
            .list_by_subscription(subscription_id)
            .await?;
        if mappings.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<FeatureId> = mappings.iter().map(|m| m.feature_id).collect();
        self.features.list_by_ids(&ids).await
    }

    /// Subscriptions currently held by a user.
    pub async fn subscriptions_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Subscription>, DomainError> {
        let mappings = self.user_subscriptions.list_by_user(user_id).await?;
        if mappings.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<SubscriptionId> = mappings.iter().map(|m| m.subscription_id).collect();
        self.subscriptions.list_by_ids(&ids).await
    }

    // Feature catalogue

    pub async fn create_feature(&self, feature: &NewFeature) -> Result<Feature, DomainError> {
        self.features.create(feature).await
    }

    pub async fn list_features(&self) -> Result<Vec<Feature>, DomainError> {
        self.features.list_all().await
    }

    pub async fn update_feature(
        &self,
        id: FeatureId,
        update: &FeatureUpdate,
    ) -> Result<Feature, DomainError> {
        let mut feature = self
            .features
            .find_by_id(id)
            .await?
            .ok_or(DomainError::FeatureNotFound)?;
        if let Some(name) = &update.name {
            feature.name = name.clone();
        }
        if let Some(permission) = &update.permission {
            feature.permission = permission.clone();
        }
        self.features.update(&feature).await
    }

    pub async fn delete_feature(&self, id: FeatureId) -> Result<(), DomainError> {
        self.features.delete(id).await
    }

    // Subscription catalogue

    pub async fn create_subscription(
        &self,
        subscription: &NewSubscription,
    ) -> Result<Subscription, DomainError> {
        self.subscriptions.create(subscription).await
    }

    pub async fn list_subscriptions(&self) -> Result<Vec<Subscription>, DomainError> {
        self.subscriptions.list_all().await
    }

    pub async fn update_subscription(
        &self,
        id: SubscriptionId,
        update: &SubscriptionUpdate,
    ) -> Result<Subscription, DomainError> {
        let mut subscription = self
            .subscriptions
            .find_by_id(id)
            .await?
            .ok_or(DomainError::SubscriptionNotFound)?;
        if let Some(name) = &update.name {
            subscription.name = name.clone();
        }
        if let Some(code) = &update.code {
            subscription.code = code.clone();
        }
        self.subscriptions.update(&subscription).await
    }

    pub async fn delete_subscription(&self, id: SubscriptionId) -> Result<(), DomainError> {
        self.subscriptions.delete(id).await
    }

    // Subscription history

    pub async fn record_subscription_history(
        &self,
        history: &NewUserSubscriptionHistory,
    ) -> Result<UserSubscriptionHistory, DomainError> {
        self.history.create(history).await
    }

    pub async fn history_for_user(
        &self,
        user_id: UserId,
    ) -> Result<UserSubscriptionHistory, DomainError> {
        self.history
            .find_by_user(user_id)
            .await?
            .ok_or(DomainError::SubscriptionHistoryNotFound)
    }

    pub async fn list_histories(&self) -> Result<Vec<UserSubscriptionHistory>, DomainError> {
        self.history.list_all().await
    }

    pub async fn update_history(
        &self,
        history: &UserSubscriptionHistory,
    ) -> Result<UserSubscriptionHistory, DomainError> {
        self.history.update(history).await
    }

    pub async fn delete_history_for_user(&self, user_id: UserId) -> Result<(), DomainError> {
        self.history.delete_by_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::repositories::feature_repository::{
        MockFeatureRepository, MockUserFeatureMappingRepository,
    };
    use crate::repositories::subscription_repository::{
        MockFeatureSubscriptionMappingRepository, MockSubscriptionHistoryRepository,
        MockSubscriptionRepository, MockUserSubscriptionMappingRepository,
    };

    fn feature(id: FeatureId) -> Feature {
        Feature {
            id,
            name: format!("feature-{id}"),
            permission: format!("perm-{id}"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    struct Mocks {
        features: MockFeatureRepository,
        user_features: MockUserFeatureMappingRepository,
        subscriptions: MockSubscriptionRepository,
        user_subscriptions: MockUserSubscriptionMappingRepository,
        feature_subscriptions: MockFeatureSubscriptionMappingRepository,
        history: MockSubscriptionHistoryRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                features: MockFeatureRepository::new(),
                user_features: MockUserFeatureMappingRepository::new(),
                subscriptions: MockSubscriptionRepository::new(),
                user_subscriptions: MockUserSubscriptionMappingRepository::new(),
                feature_subscriptions: MockFeatureSubscriptionMappingRepository::new(),
                history: MockSubscriptionHistoryRepository::new(),
            }
        }

        fn into_service(self) -> EntitlementService {
            EntitlementService::new(
                Arc::new(self.features),
                Arc::new(self.user_features),
                Arc::new(self.subscriptions),
                Arc::new(self.user_subscriptions),
                Arc::new(self.feature_subscriptions),
                Arc::new(self.history),
            )
        }
    }

    #[tokio::test]
    async fn test_features_for_user_unions_both_paths() {
        let mut mocks = Mocks::new();
        // Direct grant of feature 1; subscription 9 bundles features 1 and 2.
        mocks.user_features.expect_list_by_user().returning(|user_id| {
            Ok(vec![UserFeatureMapping {
                id: 1,
                user_id,
                feature_id: 1,
            }])
        });
        mocks
            .user_subscriptions
            .expect_list_by_user()
            .returning(|user_id| {
                Ok(vec![UserSubscriptionMapping {
                    id: 1,
                    user_id,
                    subscription_id: 9,
                }])
            });
        mocks
            .feature_subscriptions
            .expect_list_by_subscriptions()
            .withf(|ids| ids == [9])
            .returning(|_| {
                Ok(vec![
                    FeatureSubscriptionMapping {
                        id: 1,
                        feature_id: 1,
                        subscription_id: 9,
                    },
                    FeatureSubscriptionMapping {
                        id: 2,
                        feature_id: 2,
                        subscription_id: 9,
                    },
                ])
            });
        mocks
            .features
            .expect_list_by_ids()
            .withf(|ids| ids == [1, 2])
            .returning(|ids| Ok(ids.iter().map(|id| feature(*id)).collect()));

        let features = mocks.into_service().features_for_user(1).await.unwrap();
        let ids: Vec<FeatureId> = features.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_subscription_only_grant_reaches_bundled_feature() {
        let mut mocks = Mocks::new();
        // U1 holds S1 but has no direct grant of F1.
        mocks
            .user_features
            .expect_list_by_user()
            .returning(|_| Ok(Vec::new()));
        mocks
            .user_subscriptions
            .expect_list_by_user()
            .returning(|user_id| {
                Ok(vec![UserSubscriptionMapping {
                    id: 1,
                    user_id,
                    subscription_id: 1,
                }])
            });
        mocks
            .feature_subscriptions
            .expect_list_by_subscriptions()
            .returning(|_| {
                Ok(vec![FeatureSubscriptionMapping {
                    id: 1,
                    feature_id: 1,
                    subscription_id: 1,
                }])
            });
        mocks
            .features
            .expect_list_by_ids()
            .returning(|ids| Ok(ids.iter().map(|id| feature(*id)).collect()));

        let features = mocks.into_service().features_for_user(1).await.unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].id, 1);
    }

    #[tokio::test]
    async fn test_features_for_user_empty_without_grants() {
        let mut mocks = Mocks::new();
        mocks
            .user_features
            .expect_list_by_user()
            .returning(|_| Ok(Vec::new()));
        mocks
            .user_subscriptions
            .expect_list_by_user()
            .returning(|_| Ok(Vec::new()));

        let features = mocks.into_service().features_for_user(1).await.unwrap();
        assert!(features.is_empty());
    }

    #[tokio::test]
    async fn test_batch_direct_grant_creates_all_pairs() {
        let mut mocks = Mocks::new();
        mocks
            .user_features
            .expect_create_many()
            .withf(|mappings| mappings.len() == 2 && mappings.iter().all(|m| m.feature_id == 4))
            .returning(|mappings| {
                Ok(mappings
                    .iter()
                    .enumerate()
                    .map(|(i, m)| UserFeatureMapping {
                        id: i as i64 + 1,
                        user_id: m.user_id,
                        feature_id: m.feature_id,
                    })
                    .collect())
            });

        let requested = [
            NewUserFeatureMapping {
                user_id: 1,
                feature_id: 4,
            },
            NewUserFeatureMapping {
                user_id: 2,
                feature_id: 4,
            },
        ];
        let granted = mocks
            .into_service()
            .grant_features_direct_many(&requested)
            .await
            .unwrap();
        assert_eq!(granted.len(), 2);
        assert_eq!(granted[0].user_id, 1);
        assert_eq!(granted[1].user_id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_direct_grant_is_rejected() {
        let mut mocks = Mocks::new();
        mocks
            .user_features
            .expect_create()
            .returning(|_| Err(DomainError::DuplicateGrant("user-feature".to_string())));

        let err = mocks
            .into_service()
            .grant_feature_direct(1, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateGrant(_)));
    }

    #[tokio::test]
    async fn test_grant_by_unknown_permission_code() {
        let mut mocks = Mocks::new();
        mocks
            .features
            .expect_find_by_permission()
            .returning(|_| Ok(None));

        let err = mocks
            .into_service()
            .grant_features_by_permission(1, &["no-such-permission"])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::FeatureNotFound));
    }
}
