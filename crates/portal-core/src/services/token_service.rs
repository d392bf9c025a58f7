//! Token issuance and validation
//!
//! Tokens are opaque random values with a fixed expiry. Expiry is checked
//! lazily at lookup time; there is no background sweep and no revocation.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use portal_shared::UserId;

use crate::domain::{NewToken, Token, TokenIdentity};
use crate::error::DomainError;
use crate::repositories::TokenRepository;

pub struct TokenService {
    tokens: Arc<dyn TokenRepository>,
}

impl TokenService {
    pub fn new(tokens: Arc<dyn TokenRepository>) -> Self {
        Self { tokens }
    }

    /// Issues and persists a fresh token expiring at `now + ttl`.
    pub async fn issue(&self, user_id: UserId, ttl: Duration) -> Result<Token, DomainError> {
        let token = self.tokens.create(&NewToken::issue(user_id, ttl)).await?;
        info!(user_id, token_id = token.id, "Token issued");
        Ok(token)
    }

    /// Resolves a token value to its owning user and remaining lifetime.
    ///
    /// `TokenNotFound` and `TokenExpired` are logged distinctly but must
    /// both be presented as unauthenticated at the response boundary.
    pub async fn validate(&self, value: &str) -> Result<TokenIdentity, DomainError> {
        let parsed = Uuid::parse_str(value).map_err(|_| {
            debug!("Token validation failed: value is not a UUID");
            DomainError::TokenNotFound
        })?;

        let token = self
            .tokens
            .find_by_value(parsed)
            .await?
            .ok_or_else(|| {
                warn!("Token validation failed: no matching token");
                DomainError::TokenNotFound
            })?;

        let now = Utc::now();
        if token.is_expired_at(now) {
            warn!(user_id = token.user_id, "Token validation failed: token expired");
            return Err(DomainError::TokenExpired);
        }

        Ok(TokenIdentity {
            user_id: token.user_id,
            expires_in_seconds: token.expires_in_seconds(now),
        })
    }

    /// Deletes expired rows; invoked by operators, never by a scheduler.
    pub async fn purge_expired(&self) -> Result<u64, DomainError> {
        let purged = self.tokens.delete_expired().await?;
        info!(purged, "Expired tokens purged");
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::token_repository::MockTokenRepository;

    fn stored(user_id: UserId, value: Uuid, expiry: chrono::DateTime<Utc>) -> Token {
        Token {
            id: 1,
            user_id,
            value,
            expiry,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_issue_persists_and_returns_token() {
        let mut repo = MockTokenRepository::new();
        repo.expect_create()
            .withf(|t| t.user_id == 42 && t.expiry > Utc::now())
            .returning(|t| Ok(stored(t.user_id, t.value, t.expiry)));

        let service = TokenService::new(Arc::new(repo));
        let token = service.issue(42, Duration::hours(72)).await.unwrap();
        assert_eq!(token.user_id, 42);
    }

    #[tokio::test]
    async fn test_validate_returns_identity_with_remaining_ttl() {
        let value = Uuid::new_v4();
        let mut repo = MockTokenRepository::new();
        repo.expect_find_by_value()
            .returning(move |v| Ok(Some(stored(7, v, Utc::now() + Duration::hours(72)))));

        let service = TokenService::new(Arc::new(repo));
        let identity = service.validate(&value.to_string()).await.unwrap();
        assert_eq!(identity.user_id, 7);
        assert!(identity.expires_in_seconds > 72 * 3600 - 5);
        assert!(identity.expires_in_seconds <= 72 * 3600);
    }

    #[tokio::test]
    async fn test_validate_unknown_value_is_not_found() {
        let mut repo = MockTokenRepository::new();
        repo.expect_find_by_value().returning(|_| Ok(None));

        let service = TokenService::new(Arc::new(repo));
        let err = service.validate(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, DomainError::TokenNotFound));
    }

    #[tokio::test]
    async fn test_validate_expired_token() {
        let mut repo = MockTokenRepository::new();
        repo.expect_find_by_value()
            .returning(|v| Ok(Some(stored(7, v, Utc::now() - Duration::seconds(1)))));

        let service = TokenService::new(Arc::new(repo));
        let err = service.validate(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, DomainError::TokenExpired));
    }

    #[tokio::test]
    async fn test_validate_malformed_value_is_not_found() {
        let repo = MockTokenRepository::new();
        let service = TokenService::new(Arc::new(repo));
        let err = service.validate("not-a-uuid").await.unwrap_err();
        assert!(matches!(err, DomainError::TokenNotFound));
    }
}
