//! Route table

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{auth, features, health, subscriptions, tenants, users};
use crate::middleware::require_session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/validate", post(auth::validate));

    let protected = Router::new()
        // Session
        .route("/api/v1/tokens/purge", post(auth::purge_tokens))
        // Users
        .route("/api/v1/users", get(users::list))
        .route("/api/v1/users/profile", get(users::profile))
        .route("/api/v1/users/password", put(users::change_password))
        .route("/api/v1/users/features", get(features::my_features))
        .route("/api/v1/users/subscriptions", get(subscriptions::my_subscriptions))
        .route(
            "/api/v1/users/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
        // Tenants
        .route("/api/v1/company/resolve", get(tenants::resolve))
        .route("/api/v1/tenants", post(tenants::create).get(tenants::list))
        .route("/api/v1/tenants/user", get(tenants::my_tenants))
        .route("/api/v1/tenants/{id}", put(tenants::update))
        .route("/api/v1/tenants/{id}/users", post(tenants::map_users))
        .route(
            "/api/v1/tenants/{id}/users/{user_id}",
            delete(tenants::unmap_user),
        )
        // Features
        .route("/api/v1/features", post(features::create).get(features::list))
        .route("/api/v1/features/map", post(features::grant))
        .route(
            "/api/v1/features/map/permissions",
            post(features::grant_by_permission),
        )
        .route("/api/v1/features/map/{user_id}", delete(features::revoke_all))
        .route(
            "/api/v1/features/map/{user_id}/{feature_id}",
            delete(features::revoke),
        )
        .route("/api/v1/features/user/{user_id}", get(features::user_features))
        .route("/api/v1/features/{id}/users", post(features::grant_many))
        .route(
            "/api/v1/features/{id}",
            put(features::update).delete(features::delete),
        )
        // Subscriptions
        .route(
            "/api/v1/subscriptions",
            post(subscriptions::create).get(subscriptions::list),
        )
        .route(
            "/api/v1/subscriptions/history",
            post(subscriptions::create_history)
                .get(subscriptions::list_histories)
                .put(subscriptions::update_history),
        )
        .route(
            "/api/v1/subscriptions/history/user/{user_id}",
            get(subscriptions::user_history).delete(subscriptions::delete_history),
        )
        .route(
            "/api/v1/subscriptions/{id}",
            put(subscriptions::update).delete(subscriptions::delete),
        )
        .route(
            "/api/v1/subscriptions/{id}/features",
            get(subscriptions::plan_features).post(subscriptions::map_feature),
        )
        .route(
            "/api/v1/subscriptions/{id}/features/{feature_id}",
            delete(subscriptions::unmap_feature),
        )
        .route(
            "/api/v1/subscriptions/{id}/users",
            post(subscriptions::map_user),
        )
        .route(
            "/api/v1/subscriptions/{id}/users/{user_id}",
            delete(subscriptions::unmap_user),
        )
        .layer(from_fn_with_state(state.clone(), require_session));

    public.merge(protected).with_state(state)
}
