//! Common identifier types

/// Database identifier of a user row.
pub type UserId = i64;

/// Database identifier of a tenant row.
pub type TenantId = i64;

/// Database identifier of a token row.
pub type TokenId = i64;

/// Database identifier of a feature row.
pub type FeatureId = i32;

/// Database identifier of a subscription row.
pub type SubscriptionId = i32;
