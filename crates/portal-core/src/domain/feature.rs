//! Feature entity and direct user grants

use chrono::{DateTime, Utc};
use portal_shared::{FeatureId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub name: String,
    /// Unique string key used for permission checks.
    pub permission: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFeature {
    pub name: String,
    pub permission: String,
}

/// Direct grant; (user_id, feature_id) is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserFeatureMapping {
    pub id: i64,
    pub user_id: UserId,
    pub feature_id: FeatureId,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NewUserFeatureMapping {
    pub user_id: UserId,
    pub feature_id: FeatureId,
}
