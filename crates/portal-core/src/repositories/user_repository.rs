//! User repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portal_shared::UserId;

use crate::domain::{NewUser, User};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_mobile_number(&self, mobile: &str) -> Result<Option<User>, DomainError>;
    async fn list_all(&self) -> Result<Vec<User>, DomainError>;
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;
    async fn update(&self, user: &User) -> Result<User, DomainError>;
    async fn update_last_login(&self, id: UserId, at: DateTime<Utc>) -> Result<(), DomainError>;
    async fn delete(&self, id: UserId) -> Result<(), DomainError>;
}
