//! User domain entity

use chrono::{DateTime, Utc};
use portal_shared::UserId;
use serde::{Deserialize, Serialize};

/// User type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Client,
    System,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Client => "client",
            UserType::System => "system",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "client" => Some(UserType::Client),
            "system" => Some(UserType::System),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub mobile_number: String,
    pub country_id: Option<i32>,
    pub user_type: UserType,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a user; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub mobile_number: String,
    pub country_id: Option<i32>,
    pub user_type: UserType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_type_round_trip() {
        assert_eq!(UserType::from_str("client"), Some(UserType::Client));
        assert_eq!(UserType::from_str("system"), Some(UserType::System));
        assert_eq!(UserType::from_str("admin"), None);
        assert_eq!(UserType::Client.as_str(), "client");
    }
}
