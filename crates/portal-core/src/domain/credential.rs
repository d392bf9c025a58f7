//! User credential entity
//!
//! One row per user: bcrypt hash over `password + salt` plus the salt
//! itself. The plaintext never appears here, in the store, or in logs.

use chrono::{DateTime, Utc};
use portal_shared::UserId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredential {
    pub id: i64,
    pub user_id: UserId,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub salt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for storing a freshly hashed credential.
#[derive(Debug, Clone)]
pub struct NewUserCredential {
    pub user_id: UserId,
    pub password_hash: String,
    pub salt: String,
}
