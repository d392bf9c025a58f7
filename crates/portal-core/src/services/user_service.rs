//! User profile and account management

use std::sync::Arc;

use tracing::{info, warn};

use portal_shared::UserId;

use portal_security::PasswordService;

use crate::domain::User;
use crate::error::DomainError;
use crate::repositories::{CredentialRepository, UserRepository};

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub mobile_number: Option<String>,
    pub country_id: Option<i32>,
    pub is_active: Option<bool>,
}

pub struct UserService {
    users: Arc<dyn UserRepository>,
    credentials: Arc<dyn CredentialRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, credentials: Arc<dyn CredentialRepository>) -> Self {
        Self { users, credentials }
    }

    pub async fn get(&self, id: UserId) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(DomainError::UserNotFound)
    }

    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.users.list_all().await
    }

    pub async fn update(&self, id: UserId, update: &UserUpdate) -> Result<User, DomainError> {
        let mut user = self.get(id).await?;
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        if let Some(mobile) = &update.mobile_number {
            user.mobile_number = mobile.clone();
        }
        if let Some(country_id) = update.country_id {
            user.country_id = Some(country_id);
        }
        if let Some(is_active) = update.is_active {
            user.is_active = is_active;
        }
        self.users.update(&user).await
    }

    pub async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        info!(user_id = id, "Deleting user");
        self.users.delete(id).await
    }

    /// Verifies the old password, then stores a new salt and hash.
    pub async fn change_password(
        &self,
        user_id: UserId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        let credential = self
            .credentials
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id, "Password change failed: no stored credential");
                DomainError::InvalidCredentials
            })?;

        let valid =
            PasswordService::verify(old_password, &credential.salt, &credential.password_hash)?;
        if !valid {
            warn!(user_id, "Password change failed: old password mismatch");
            return Err(DomainError::InvalidCredentials);
        }

        let new_salt = PasswordService::generate_salt()?;
        let new_hash = PasswordService::hash(new_password, &new_salt)?;
        self.credentials
            .update_password(user_id, &new_hash, &new_salt)
            .await?;

        info!(user_id, "Password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::{UserCredential, UserType};
    use crate::repositories::credential_repository::MockCredentialRepository;
    use crate::repositories::user_repository::MockUserRepository;

    fn user(id: i64) -> User {
        User {
            id,
            email: "alice@x.com".to_string(),
            name: "Alice".to_string(),
            mobile_number: "1234567890".to_string(),
            country_id: None,
            user_type: UserType::Client,
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn credential_for(user_id: i64, password: &str) -> UserCredential {
        let salt = PasswordService::generate_salt().unwrap();
        let password_hash = PasswordService::hash(password, &salt).unwrap();
        UserCredential {
            id: 1,
            user_id,
            password_hash,
            salt,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_update_merges_partial_fields() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|id| Ok(Some(user(id))));
        users.expect_update().returning(|u| Ok(u.clone()));

        let service = UserService::new(Arc::new(users), Arc::new(MockCredentialRepository::new()));
        let update = UserUpdate {
            name: Some("Alice B".to_string()),
            is_active: Some(false),
            ..Default::default()
        };
        let updated = service.update(1, &update).await.unwrap();
        assert_eq!(updated.name, "Alice B");
        assert!(!updated.is_active);
        // Untouched fields keep their stored values
        assert_eq!(updated.email, "alice@x.com");
    }

    #[tokio::test]
    async fn test_change_password_rejects_wrong_old_password() {
        let mut credentials = MockCredentialRepository::new();
        credentials
            .expect_find_by_user_id()
            .returning(|user_id| Ok(Some(credential_for(user_id, "old-pass"))));

        let service = UserService::new(Arc::new(MockUserRepository::new()), Arc::new(credentials));
        let err = service
            .change_password(1, "wrong", "new-pass")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_change_password_stores_new_salt_and_hash() {
        let mut credentials = MockCredentialRepository::new();
        let old = credential_for(1, "old-pass");
        let old_salt = old.salt.clone();
        credentials
            .expect_find_by_user_id()
            .returning(move |_| Ok(Some(old.clone())));
        credentials
            .expect_update_password()
            .withf(move |user_id, hash, salt| {
                *user_id == 1
                    && *salt != old_salt
                    && PasswordService::verify("new-pass", salt, hash).unwrap()
            })
            .returning(|_, _, _| Ok(()));

        let service = UserService::new(Arc::new(MockUserRepository::new()), Arc::new(credentials));
        service.change_password(1, "old-pass", "new-pass").await.unwrap();
    }
}
