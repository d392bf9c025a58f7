//! Session middleware
//!
//! Reads the `Token` request header, validates it against the token
//! store, and makes the resolved user id available to handlers as a
//! request extension. Requests without a valid token never reach the
//! inner handler.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use portal_shared::constants::TOKEN_HEADER;
use portal_shared::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// Identity of the authenticated caller, inserted by [`require_session`].
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: UserId,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".to_string()))
    }
}

pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let value = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    let identity = state.tokens.validate(value).await?;

    request.extensions_mut().insert(AuthUser {
        user_id: identity.user_id,
    });
    Ok(next.run(request).await)
}
