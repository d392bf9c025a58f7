//! Domain error to HTTP response mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use portal_core::error::DomainError;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationError(msg) => ApiError::BadRequest(msg),
            DomainError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            // Unknown and expired tokens are indistinguishable to clients.
            DomainError::TokenNotFound | DomainError::TokenExpired => {
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            DomainError::UserNotActive => ApiError::Forbidden("User is not active".to_string()),
            DomainError::NotAMember { .. } => {
                ApiError::Forbidden("User is not a member of this company".to_string())
            }
            DomainError::UserNotFound => ApiError::NotFound("User not found".to_string()),
            DomainError::UnknownTenant(_) => ApiError::NotFound("Company not found".to_string()),
            DomainError::FeatureNotFound => ApiError::NotFound("Feature not found".to_string()),
            DomainError::SubscriptionNotFound => {
                ApiError::NotFound("Subscription not found".to_string())
            }
            DomainError::SubscriptionHistoryNotFound => {
                ApiError::NotFound("Subscription history not found".to_string())
            }
            DomainError::EmailAlreadyExists(email) => {
                ApiError::Conflict(format!("Email already exists: {email}"))
            }
            DomainError::MobileNumberAlreadyExists(mobile) => {
                ApiError::Conflict(format!("Mobile number already exists: {mobile}"))
            }
            DomainError::TenantGuidAlreadyExists(guid) => {
                ApiError::Conflict(format!("Company GUID already exists: {guid}"))
            }
            DomainError::DuplicateGrant(what) => {
                ApiError::Conflict(format!("Already exists: {what}"))
            }
            DomainError::BootstrapEntitlementMissing(what)
            | DomainError::PasswordHashError(what)
            | DomainError::RandomSourceError(what)
            | DomainError::DatabaseError(what)
            | DomainError::InternalError(what) => ApiError::Internal(what),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
            }
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg)
            }
            ApiError::Forbidden(msg) => {
                tracing::warn!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, "FORBIDDEN", msg)
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg)
            }
            ApiError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, "CONFLICT", msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ApiResponse::<()>::error(code, &message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_and_expired_tokens_map_to_same_response() {
        let not_found = ApiError::from(DomainError::TokenNotFound);
        let expired = ApiError::from(DomainError::TokenExpired);
        assert_eq!(not_found.to_string(), expired.to_string());
        assert_eq!(
            not_found.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(expired.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_duplicate_grant_is_conflict() {
        let err = ApiError::from(DomainError::DuplicateGrant("user-feature".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_internal_errors_do_not_leak_details() {
        let err = ApiError::from(DomainError::DatabaseError("connection refused".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
