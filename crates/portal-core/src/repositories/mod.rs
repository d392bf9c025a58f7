//! Repository traits (ports)
//!
//! One small data-access interface per entity, implemented by the
//! infrastructure crate and mocked in service tests. Uniqueness of
//! mapping pairs, emails, GUIDs, and token values is delegated to the
//! store's unique indexes; implementations surface violations as the
//! matching `DomainError` variant.

pub mod credential_repository;
pub mod feature_repository;
pub mod subscription_repository;
pub mod tenant_repository;
pub mod token_repository;
pub mod user_repository;

pub use credential_repository::CredentialRepository;
pub use feature_repository::{FeatureRepository, UserFeatureMappingRepository};
pub use subscription_repository::{
    FeatureSubscriptionMappingRepository, SubscriptionHistoryRepository, SubscriptionRepository,
    UserSubscriptionMappingRepository,
};
pub use tenant_repository::{TenantRepository, UserTenantMappingRepository};
pub use token_repository::TokenRepository;
pub use user_repository::UserRepository;
