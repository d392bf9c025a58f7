//! Subscription, plan composition, and history handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use portal_core::domain::{
    Feature, FeatureSubscriptionMapping, NewFeatureSubscriptionMapping, NewSubscription,
    NewUserSubscriptionHistory, NewUserSubscriptionMapping, Subscription, UserSubscriptionHistory,
    UserSubscriptionMapping,
};
use portal_shared::{FeatureId, SubscriptionId, UserId};

use crate::dto::{MapFeatureRequest, MapUserRequest, SubscriptionUpdateRequest};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/users/subscriptions
pub async fn my_subscriptions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Subscription>>>, ApiError> {
    let subscriptions = state.entitlements.subscriptions_for_user(auth.user_id).await?;
    Ok(Json(ApiResponse::success(subscriptions)))
}

/// POST /api/v1/subscriptions
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewSubscription>,
) -> Result<(StatusCode, Json<ApiResponse<Subscription>>), ApiError> {
    let subscription = state.entitlements.create_subscription(&payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(subscription))))
}

/// GET /api/v1/subscriptions
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Subscription>>>, ApiError> {
    let subscriptions = state.entitlements.list_subscriptions().await?;
    Ok(Json(ApiResponse::success(subscriptions)))
}

/// PUT /api/v1/subscriptions/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<SubscriptionId>,
    Json(payload): Json<SubscriptionUpdateRequest>,
) -> Result<Json<ApiResponse<Subscription>>, ApiError> {
    let subscription = state
        .entitlements
        .update_subscription(id, &payload.into())
        .await?;
    Ok(Json(ApiResponse::success(subscription)))
}

/// DELETE /api/v1/subscriptions/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<SubscriptionId>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.entitlements.delete_subscription(id).await?;
    Ok(Json(ApiResponse::success(())))
}

/// GET /api/v1/subscriptions/{id}/features
pub async fn plan_features(
    State(state): State<AppState>,
    Path(id): Path<SubscriptionId>,
) -> Result<Json<ApiResponse<Vec<Feature>>>, ApiError> {
    let features = state.entitlements.features_for_subscription(id).await?;
    Ok(Json(ApiResponse::success(features)))
}

/// POST /api/v1/subscriptions/{id}/features
pub async fn map_feature(
    State(state): State<AppState>,
    Path(id): Path<SubscriptionId>,
    Json(payload): Json<MapFeatureRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FeatureSubscriptionMapping>>), ApiError> {
    let mapping = state
        .entitlements
        .map_feature_to_subscription(&NewFeatureSubscriptionMapping {
            feature_id: payload.feature_id,
            subscription_id: id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(mapping))))
}

/// DELETE /api/v1/subscriptions/{id}/features/{feature_id}
pub async fn unmap_feature(
    State(state): State<AppState>,
    Path((id, feature_id)): Path<(SubscriptionId, FeatureId)>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .entitlements
        .unmap_feature_from_subscription(feature_id, id)
        .await?;
    Ok(Json(ApiResponse::success(())))
}

/// POST /api/v1/subscriptions/{id}/users
pub async fn map_user(
    State(state): State<AppState>,
    Path(id): Path<SubscriptionId>,
    Json(payload): Json<MapUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserSubscriptionMapping>>), ApiError> {
    let mapping = state
        .entitlements
        .map_user_to_subscription(&NewUserSubscriptionMapping {
            user_id: payload.user_id,
            subscription_id: id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(mapping))))
}

/// DELETE /api/v1/subscriptions/{id}/users/{user_id}
pub async fn unmap_user(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(SubscriptionId, UserId)>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .entitlements
        .unmap_user_from_subscription(user_id, id)
        .await?;
    Ok(Json(ApiResponse::success(())))
}

/// POST /api/v1/subscriptions/history
pub async fn create_history(
    State(state): State<AppState>,
    Json(payload): Json<NewUserSubscriptionHistory>,
) -> Result<(StatusCode, Json<ApiResponse<UserSubscriptionHistory>>), ApiError> {
    let history = state.entitlements.record_subscription_history(&payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(history))))
}

/// GET /api/v1/subscriptions/history
pub async fn list_histories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserSubscriptionHistory>>>, ApiError> {
    let histories = state.entitlements.list_histories().await?;
    Ok(Json(ApiResponse::success(histories)))
}

/// GET /api/v1/subscriptions/history/user/{user_id}
pub async fn user_history(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<ApiResponse<UserSubscriptionHistory>>, ApiError> {
    let history = state.entitlements.history_for_user(user_id).await?;
    Ok(Json(ApiResponse::success(history)))
}

/// PUT /api/v1/subscriptions/history
pub async fn update_history(
    State(state): State<AppState>,
    Json(payload): Json<UserSubscriptionHistory>,
) -> Result<Json<ApiResponse<UserSubscriptionHistory>>, ApiError> {
    let history = state.entitlements.update_history(&payload).await?;
    Ok(Json(ApiResponse::success(history)))
}

/// DELETE /api/v1/subscriptions/history/user/{user_id}
pub async fn delete_history(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.entitlements.delete_history_for_user(user_id).await?;
    Ok(Json(ApiResponse::success(())))
}
