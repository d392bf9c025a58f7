//! Application state: repository adapters wired into domain services

use std::sync::Arc;

use chrono::Duration;
use sqlx::PgPool;

use portal_core::services::{
    AuthService, EntitlementService, TenantService, TokenService, UserService,
};
use portal_infrastructure::{
    PgCredentialRepository, PgFeatureRepository, PgFeatureSubscriptionMappingRepository,
    PgSubscriptionHistoryRepository, PgSubscriptionRepository, PgTenantRepository,
    PgTokenRepository, PgUserFeatureMappingRepository, PgUserRepository,
    PgUserSubscriptionMappingRepository, PgUserTenantMappingRepository,
};
use portal_shared::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenService>,
    pub users: Arc<UserService>,
    pub tenants: Arc<TenantService>,
    pub entitlements: Arc<EntitlementService>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        let users = Arc::new(PgUserRepository::new(pool.clone()));
        let credentials = Arc::new(PgCredentialRepository::new(pool.clone()));
        let token_repo = Arc::new(PgTokenRepository::new(pool.clone()));
        let tenants = Arc::new(PgTenantRepository::new(pool.clone()));
        let tenant_mappings = Arc::new(PgUserTenantMappingRepository::new(pool.clone()));
        let features = Arc::new(PgFeatureRepository::new(pool.clone()));
        let feature_mappings = Arc::new(PgUserFeatureMappingRepository::new(pool.clone()));
        let subscriptions = Arc::new(PgSubscriptionRepository::new(pool.clone()));
        let subscription_mappings =
            Arc::new(PgUserSubscriptionMappingRepository::new(pool.clone()));
        let feature_subscriptions =
            Arc::new(PgFeatureSubscriptionMappingRepository::new(pool.clone()));
        let histories = Arc::new(PgSubscriptionHistoryRepository::new(pool));

        let tokens = Arc::new(TokenService::new(token_repo));
        let auth = Arc::new(AuthService::new(
            users.clone(),
            credentials.clone(),
            tenants.clone(),
            tenant_mappings.clone(),
            subscriptions.clone(),
            subscription_mappings.clone(),
            tokens.clone(),
            Duration::hours(config.auth.token_ttl_hours),
        ));

        Self {
            auth,
            tokens,
            users: Arc::new(UserService::new(users, credentials)),
            tenants: Arc::new(TenantService::new(tenants, tenant_mappings)),
            entitlements: Arc::new(EntitlementService::new(
                features,
                feature_mappings,
                subscriptions,
                subscription_mappings,
                feature_subscriptions,
                histories,
            )),
            config,
        }
    }
}
