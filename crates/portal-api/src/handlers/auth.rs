//! Authentication handlers (register, login, validate)

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};

use portal_core::domain::{TokenIdentity, User, UserType};
use portal_core::services::{LoginIdentifier, NewRegistration};
use portal_shared::constants::TOKEN_HEADER;
use portal_shared::validation::{is_valid_email, is_valid_mobile_number};
use validator::Validate;

use crate::dto::{decode_password, LoginRequest, LoginResponse, RegisterRequest};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if !is_valid_email(&payload.email) {
        return Err(ApiError::BadRequest("Invalid email address".to_string()));
    }
    if !is_valid_mobile_number(&payload.mobile_number) {
        return Err(ApiError::BadRequest("Invalid mobile number".to_string()));
    }
    let user_type = UserType::from_str(&payload.user_type)
        .ok_or_else(|| ApiError::BadRequest("Invalid user type".to_string()))?;
    let password = decode_password(&payload.password)?;
    if password.is_empty() {
        return Err(ApiError::BadRequest("Password is required".to_string()));
    }

    let user = state
        .auth
        .register(&NewRegistration {
            email: payload.email,
            name: payload.name,
            mobile_number: payload.mobile_number,
            country_id: payload.country_id,
            user_type,
            password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let identifier = LoginIdentifier::classify(&payload.credential).ok_or_else(|| {
        ApiError::BadRequest("Credential must be an email address or mobile number".to_string())
    })?;
    let password = decode_password(&payload.password)?;

    let result = state.auth.login(&identifier, &password).await?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token: result.token.value,
        expiry: result.token.expiry,
        user: result.user,
    })))
}

/// POST /api/v1/auth/validate
///
/// Validates the `Token` header without going through the session
/// middleware, so callers can probe a token before using it.
pub async fn validate(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<TokenIdentity>>, ApiError> {
    let value = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    let identity = state.tokens.validate(value).await?;
    Ok(Json(ApiResponse::success(identity)))
}

/// POST /api/v1/tokens/purge
///
/// Operator cleanup of expired rows; expiry itself needs no sweep.
pub async fn purge_tokens(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<u64>>, ApiError> {
    let purged = state.tokens.purge_expired().await?;
    Ok(Json(ApiResponse::success(purged)))
}
