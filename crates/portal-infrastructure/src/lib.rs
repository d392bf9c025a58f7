//! # Portal Infrastructure
//!
//! PostgreSQL implementations of the repository ports (adapters).

pub mod database;

pub use database::{
    create_pool, run_migrations, PgCredentialRepository, PgFeatureRepository,
    PgFeatureSubscriptionMappingRepository, PgSubscriptionHistoryRepository,
    PgSubscriptionRepository, PgTenantRepository, PgTokenRepository,
    PgUserFeatureMappingRepository, PgUserRepository, PgUserSubscriptionMappingRepository,
    PgUserTenantMappingRepository,
};
