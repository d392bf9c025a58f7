//! Feature catalogue and direct-grant handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use portal_core::domain::{Feature, NewFeature, NewUserFeatureMapping, UserFeatureMapping};
use portal_shared::{FeatureId, UserId};

use crate::dto::{
    FeatureUpdateRequest, GrantByPermissionRequest, GrantFeatureRequest, MapUsersRequest,
};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/users/features
///
/// The caller's entitlements: direct grants unioned with features
/// bundled in any held subscription.
pub async fn my_features(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Feature>>>, ApiError> {
    let features = state.entitlements.features_for_user(auth.user_id).await?;
    Ok(Json(ApiResponse::success(features)))
}

/// GET /api/v1/features/user/{user_id}
pub async fn user_features(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<ApiResponse<Vec<Feature>>>, ApiError> {
    let features = state.entitlements.features_for_user(user_id).await?;
    Ok(Json(ApiResponse::success(features)))
}

/// POST /api/v1/features
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewFeature>,
) -> Result<(StatusCode, Json<ApiResponse<Feature>>), ApiError> {
    let feature = state.entitlements.create_feature(&payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(feature))))
}

/// GET /api/v1/features
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Feature>>>, ApiError> {
    let features = state.entitlements.list_features().await?;
    Ok(Json(ApiResponse::success(features)))
}

/// PUT /api/v1/features/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<FeatureId>,
    Json(payload): Json<FeatureUpdateRequest>,
) -> Result<Json<ApiResponse<Feature>>, ApiError> {
    let feature = state.entitlements.update_feature(id, &payload.into()).await?;
    Ok(Json(ApiResponse::success(feature)))
}

/// DELETE /api/v1/features/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<FeatureId>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.entitlements.delete_feature(id).await?;
    Ok(Json(ApiResponse::success(())))
}

/// POST /api/v1/features/map
pub async fn grant(
    State(state): State<AppState>,
    Json(payload): Json<GrantFeatureRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserFeatureMapping>>), ApiError> {
    let mapping = state
        .entitlements
        .grant_feature_direct(payload.user_id, payload.feature_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(mapping))))
}

/// POST /api/v1/features/map/permissions
pub async fn grant_by_permission(
    State(state): State<AppState>,
    Json(payload): Json<GrantByPermissionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<UserFeatureMapping>>>), ApiError> {
    let codes: Vec<&str> = payload.permissions.iter().map(String::as_str).collect();
    let granted = state
        .entitlements
        .grant_features_by_permission(payload.user_id, &codes)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(granted))))
}

/// POST /api/v1/features/{id}/users
///
/// Grants one feature directly to a batch of users.
pub async fn grant_many(
    State(state): State<AppState>,
    Path(id): Path<FeatureId>,
    Json(payload): Json<MapUsersRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<UserFeatureMapping>>>), ApiError> {
    let mappings: Vec<NewUserFeatureMapping> = payload
        .user_ids
        .iter()
        .map(|&user_id| NewUserFeatureMapping {
            user_id,
            feature_id: id,
        })
        .collect();

    let granted = state.entitlements.grant_features_direct_many(&mappings).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(granted))))
}

/// DELETE /api/v1/features/map/{user_id}/{feature_id}
pub async fn revoke(
    State(state): State<AppState>,
    Path((user_id, feature_id)): Path<(UserId, FeatureId)>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .entitlements
        .revoke_feature_direct(user_id, feature_id)
        .await?;
    Ok(Json(ApiResponse::success(())))
}

/// DELETE /api/v1/features/map/{user_id}
pub async fn revoke_all(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<ApiResponse<u64>>, ApiError> {
    let revoked = state.entitlements.revoke_all_for_user(user_id).await?;
    Ok(Json(ApiResponse::success(revoked)))
}
