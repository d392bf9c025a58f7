//! Bearer token entity
//!
//! Lifecycle is `Issued -> Valid -> Expired`; expiry is the only
//! termination path, checked lazily at lookup time.

use chrono::{DateTime, Duration, Utc};
use portal_shared::{TokenId, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub user_id: UserId,
    pub value: Uuid,
    pub expiry: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Token {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiry
    }

    /// Seconds remaining before expiry, clamped at zero.
    pub fn expires_in_seconds(&self, now: DateTime<Utc>) -> i64 {
        (self.expiry - now).num_seconds().max(0)
    }
}

/// Payload for issuing a token; the value is freshly generated.
#[derive(Debug, Clone)]
pub struct NewToken {
    pub user_id: UserId,
    pub value: Uuid,
    pub expiry: DateTime<Utc>,
}

impl NewToken {
    pub fn issue(user_id: UserId, ttl: Duration) -> Self {
        Self {
            user_id,
            value: Uuid::new_v4(),
            expiry: Utc::now() + ttl,
        }
    }
}

/// Identity resolved from a validated token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenIdentity {
    pub user_id: UserId,
    pub expires_in_seconds: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_sets_future_expiry() {
        let token = NewToken::issue(7, Duration::hours(72));
        assert_eq!(token.user_id, 7);
        assert!(token.expiry > Utc::now());
    }

    #[test]
    fn test_issued_values_are_unique() {
        let mut values = std::collections::HashSet::new();
        for _ in 0..10_000 {
            assert!(values.insert(NewToken::issue(1, Duration::hours(1)).value));
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let token = Token {
            id: 1,
            user_id: 1,
            value: Uuid::new_v4(),
            expiry: now,
            created_at: now,
            updated_at: now,
        };
        assert!(token.is_expired_at(now));
        assert!(!token.is_expired_at(now - Duration::seconds(1)));
        assert_eq!(token.expires_in_seconds(now + Duration::seconds(10)), 0);
    }
}
