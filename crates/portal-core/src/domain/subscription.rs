//! Subscription entity, plan composition, active plans, and history

use chrono::{DateTime, Utc};
use portal_shared::{FeatureId, SubscriptionId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub name: String,
    /// Unique lookup code, e.g. "demo".
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSubscription {
    pub name: String,
    pub code: String,
}

/// Active plan; (user_id, subscription_id) is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSubscriptionMapping {
    pub id: i64,
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NewUserSubscriptionMapping {
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
}

/// Plan composition; (feature_id, subscription_id) is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSubscriptionMapping {
    pub id: i64,
    pub feature_id: FeatureId,
    pub subscription_id: SubscriptionId,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NewFeatureSubscriptionMapping {
    pub feature_id: FeatureId,
    pub subscription_id: SubscriptionId,
}

/// Lifecycle record per (user, subscription); the pair is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSubscriptionHistory {
    pub id: i64,
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
    pub start_date: DateTime<Utc>,
    pub renewal_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub number_of_renewals: i16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUserSubscriptionHistory {
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
    pub renewal_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
}
