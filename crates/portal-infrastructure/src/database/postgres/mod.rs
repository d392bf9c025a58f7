//! PostgreSQL repository implementations

pub mod credential_repo_impl;
pub mod feature_repo_impl;
pub mod subscription_repo_impl;
pub mod tenant_repo_impl;
pub mod token_repo_impl;
pub mod user_repo_impl;

pub use credential_repo_impl::PgCredentialRepository;
pub use feature_repo_impl::{PgFeatureRepository, PgUserFeatureMappingRepository};
pub use subscription_repo_impl::{
    PgFeatureSubscriptionMappingRepository, PgSubscriptionHistoryRepository,
    PgSubscriptionRepository, PgUserSubscriptionMappingRepository,
};
pub use tenant_repo_impl::{PgTenantRepository, PgUserTenantMappingRepository};
pub use token_repo_impl::PgTokenRepository;
pub use user_repo_impl::PgUserRepository;

use portal_core::error::DomainError;

/// True when the error is a unique-constraint violation, used to turn
/// insert conflicts into domain errors instead of opaque database errors.
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

pub(crate) fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    tracing::error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}
