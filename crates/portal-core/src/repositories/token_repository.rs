//! Token repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewToken, Token};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn create(&self, token: &NewToken) -> Result<Token, DomainError>;
    async fn find_by_value(&self, value: Uuid) -> Result<Option<Token>, DomainError>;
    /// Operator-driven cleanup; there is no background sweep.
    async fn delete_expired(&self) -> Result<u64, DomainError>;
}
