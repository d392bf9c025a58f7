//! # Portal Core - Domain Module
//!
//! Domain entities for the portal backend.

pub mod credential;
pub mod feature;
pub mod subscription;
pub mod tenant;
pub mod token;
pub mod user;

// Re-export all entities and enums
pub use credential::{NewUserCredential, UserCredential};
pub use feature::{Feature, NewFeature, NewUserFeatureMapping, UserFeatureMapping};
pub use subscription::{
    FeatureSubscriptionMapping, NewFeatureSubscriptionMapping, NewSubscription,
    NewUserSubscriptionHistory, NewUserSubscriptionMapping, Subscription, UserSubscriptionHistory,
    UserSubscriptionMapping,
};
pub use tenant::{NewTenant, NewUserTenantMapping, Tenant, TenantInfo, UserTenantMapping};
pub use token::{NewToken, Token, TokenIdentity};
pub use user::{NewUser, User, UserType};
