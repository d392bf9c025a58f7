//! Request and response DTOs
//!
//! Passwords cross the wire base64-encoded; [`decode_password`] is the
//! single place that turns the transport form back into plaintext.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use portal_core::domain::{User, UserType};
use portal_core::services::{FeatureUpdate, SubscriptionUpdate, TenantUpdate, UserUpdate};
use portal_shared::{FeatureId, UserId};

use crate::error::ApiError;

pub fn decode_password(encoded: &str) -> Result<String, ApiError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|_| ApiError::BadRequest("Password must be base64-encoded".to_string()))?;
    String::from_utf8(bytes)
        .map_err(|_| ApiError::BadRequest("Password must be valid UTF-8".to_string()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    pub mobile_number: String,
    #[serde(default)]
    pub country_id: Option<i32>,
    /// "client" or "system".
    #[serde(rename = "type", default = "default_user_type")]
    pub user_type: String,
    /// Base64-encoded plaintext.
    pub password: String,
}

fn default_user_type() -> String {
    UserType::Client.as_str().to_string()
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email-shaped or phone-shaped identifier.
    pub credential: String,
    /// Base64-encoded plaintext.
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub expiry: DateTime<Utc>,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    /// Base64-encoded plaintext.
    pub old_password: String,
    /// Base64-encoded plaintext.
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UserUpdateRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub mobile_number: Option<String>,
    pub country_id: Option<i32>,
    pub is_active: Option<bool>,
}

impl From<UserUpdateRequest> for UserUpdate {
    fn from(req: UserUpdateRequest) -> Self {
        UserUpdate {
            email: req.email,
            name: req.name,
            mobile_number: req.mobile_number,
            country_id: req.country_id,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TenantUpdateRequest {
    pub company_name: Option<String>,
    pub host: Option<String>,
    pub bmrm_port: Option<i32>,
    pub sg_biz_port: Option<i32>,
    pub tally_sync_port: Option<i32>,
}

impl From<TenantUpdateRequest> for TenantUpdate {
    fn from(req: TenantUpdateRequest) -> Self {
        TenantUpdate {
            company_name: req.company_name,
            host: req.host,
            bmrm_port: req.bmrm_port,
            sg_biz_port: req.sg_biz_port,
            tally_sync_port: req.tally_sync_port,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MapUsersRequest {
    pub user_ids: Vec<UserId>,
}

#[derive(Debug, Deserialize)]
pub struct GrantFeatureRequest {
    pub user_id: UserId,
    pub feature_id: FeatureId,
}

#[derive(Debug, Deserialize)]
pub struct GrantByPermissionRequest {
    pub user_id: UserId,
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeatureUpdateRequest {
    pub name: Option<String>,
    pub permission: Option<String>,
}

impl From<FeatureUpdateRequest> for FeatureUpdate {
    fn from(req: FeatureUpdateRequest) -> Self {
        FeatureUpdate {
            name: req.name,
            permission: req.permission,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionUpdateRequest {
    pub name: Option<String>,
    pub code: Option<String>,
}

impl From<SubscriptionUpdateRequest> for SubscriptionUpdate {
    fn from(req: SubscriptionUpdateRequest) -> Self {
        SubscriptionUpdate {
            name: req.name,
            code: req.code,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MapUserRequest {
    pub user_id: UserId,
}

#[derive(Debug, Deserialize)]
pub struct MapFeatureRequest {
    pub feature_id: FeatureId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_password_round_trip() {
        let encoded = STANDARD.encode("s3cret");
        assert_eq!(decode_password(&encoded).unwrap(), "s3cret");
    }

    #[test]
    fn test_decode_password_rejects_invalid_base64() {
        assert!(decode_password("not base64!!").is_err());
    }
}
