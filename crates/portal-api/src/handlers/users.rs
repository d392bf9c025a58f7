//! User handlers

use axum::{
    extract::{Path, State},
    Json,
};

use portal_core::domain::User;
use portal_shared::UserId;

use crate::dto::{decode_password, ChangePasswordRequest, UserUpdateRequest};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/users/profile
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.users.get(auth.user_id).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// PUT /api/v1/users/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let old_password = decode_password(&payload.old_password)?;
    let new_password = decode_password(&payload.new_password)?;
    if new_password.is_empty() {
        return Err(ApiError::BadRequest("New password is required".to_string()));
    }

    state
        .users
        .change_password(auth.user_id, &old_password, &new_password)
        .await?;
    Ok(Json(ApiResponse::success(())))
}

/// GET /api/v1/users
pub async fn list(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<User>>>, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(ApiResponse::success(users)))
}

/// GET /api/v1/users/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.users.get(id).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// PUT /api/v1/users/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(payload): Json<UserUpdateRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.users.update(id, &payload.into()).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// DELETE /api/v1/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.users.delete(id).await?;
    Ok(Json(ApiResponse::success(())))
}
