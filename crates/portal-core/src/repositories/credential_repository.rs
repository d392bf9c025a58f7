//! Credential repository trait (port)

use async_trait::async_trait;
use portal_shared::UserId;

use crate::domain::{NewUserCredential, UserCredential};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    async fn find_by_user_id(&self, user_id: UserId)
        -> Result<Option<UserCredential>, DomainError>;
    async fn create(&self, credential: &NewUserCredential) -> Result<UserCredential, DomainError>;
    async fn update_password(
        &self,
        user_id: UserId,
        password_hash: &str,
        salt: &str,
    ) -> Result<(), DomainError>;
}
