//! Registration and login flows

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{error, info, warn};

use portal_shared::constants::{DEFAULT_TENANT_COMPANY_NAME, DEMO_SUBSCRIPTION_CODE};
use portal_shared::validation::{is_valid_email, is_valid_mobile_number, mask_email};

use portal_security::PasswordService;

use crate::domain::{
    NewUser, NewUserCredential, NewUserSubscriptionMapping, NewUserTenantMapping, Token, User,
    UserType,
};
use crate::error::DomainError;
use crate::repositories::{
    CredentialRepository, SubscriptionRepository, TenantRepository, UserRepository,
    UserSubscriptionMappingRepository, UserTenantMappingRepository,
};
use crate::services::TokenService;

/// A login credential classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Email(String),
    MobileNumber(String),
}

impl LoginIdentifier {
    /// Classifies a raw identifier as email-shaped or phone-shaped.
    pub fn classify(raw: &str) -> Option<Self> {
        if is_valid_email(raw) {
            Some(LoginIdentifier::Email(raw.to_string()))
        } else if is_valid_mobile_number(raw) {
            Some(LoginIdentifier::MobileNumber(raw.to_string()))
        } else {
            None
        }
    }
}

/// Registration payload; the password has already been decoded from its
/// transport encoding by the caller.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub email: String,
    pub name: String,
    pub mobile_number: String,
    pub country_id: Option<i32>,
    pub user_type: UserType,
    pub password: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: Token,
    pub user: User,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    credentials: Arc<dyn CredentialRepository>,
    tenants: Arc<dyn TenantRepository>,
    tenant_mappings: Arc<dyn UserTenantMappingRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    subscription_mappings: Arc<dyn UserSubscriptionMappingRepository>,
    token_service: Arc<TokenService>,
    token_ttl: Duration,
}

impl AuthService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserRepository>,
        credentials: Arc<dyn CredentialRepository>,
        tenants: Arc<dyn TenantRepository>,
        tenant_mappings: Arc<dyn UserTenantMappingRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        subscription_mappings: Arc<dyn UserSubscriptionMappingRepository>,
        token_service: Arc<TokenService>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            credentials,
            tenants,
            tenant_mappings,
            subscriptions,
            subscription_mappings,
            token_service,
            token_ttl,
        }
    }

    /// Registers a new user.
    ///
    /// 1. Resolve the reserved default tenant and demo subscription
    ///    (deployment precondition, not a user error)
    /// 2. Create the user row
    /// 3. Generate a salt, hash the password, store the credential
    /// 4. Map the user into the default tenant and demo subscription
    pub async fn register(&self, registration: &NewRegistration) -> Result<User, DomainError> {
        info!(email = %mask_email(&registration.email), "Registration attempt");

        let default_tenant = self
            .tenants
            .find_by_company_name(DEFAULT_TENANT_COMPANY_NAME)
            .await?
            .ok_or_else(|| {
                error!("Reserved default tenant is missing from the store");
                DomainError::BootstrapEntitlementMissing(format!(
                    "tenant with company name '{DEFAULT_TENANT_COMPANY_NAME}'"
                ))
            })?;

        let demo_subscription = self
            .subscriptions
            .find_by_code(DEMO_SUBSCRIPTION_CODE)
            .await?
            .ok_or_else(|| {
                error!("Reserved demo subscription is missing from the store");
                DomainError::BootstrapEntitlementMissing(format!(
                    "subscription with code '{DEMO_SUBSCRIPTION_CODE}'"
                ))
            })?;

        let user = self
            .users
            .create(&NewUser {
                email: registration.email.clone(),
                name: registration.name.clone(),
                mobile_number: registration.mobile_number.clone(),
                country_id: registration.country_id,
                user_type: registration.user_type,
            })
            .await?;

        if let Err(e) = self
            .provision(&user, &registration.password, default_tenant.id, demo_subscription.id)
            .await
        {
            // Registration spans several tables without a transaction; an
            // orphaned user row would hold the email and mobile number
            // hostage, so remove it before reporting the failure.
            if let Err(cleanup) = self.users.delete(user.id).await {
                error!(
                    user_id = user.id,
                    error = %cleanup,
                    "Failed to remove user after provisioning error"
                );
            }
            return Err(e);
        }

        info!(user_id = user.id, "Registration successful");
        Ok(user)
    }

    /// Stores the credential and the default tenant and subscription
    /// mappings for a freshly created user.
    async fn provision(
        &self,
        user: &User,
        password: &str,
        tenant_id: i64,
        subscription_id: i32,
    ) -> Result<(), DomainError> {
        let salt = PasswordService::generate_salt()?;
        let password_hash = PasswordService::hash(password, &salt)?;
        self.credentials
            .create(&NewUserCredential {
                user_id: user.id,
                password_hash,
                salt,
            })
            .await?;

        self.tenant_mappings
            .create(&NewUserTenantMapping {
                user_id: user.id,
                tenant_id,
            })
            .await?;

        self.subscription_mappings
            .create(&NewUserSubscriptionMapping {
                user_id: user.id,
                subscription_id,
            })
            .await?;

        Ok(())
    }

    /// Verifies credentials and issues a bearer token.
    pub async fn login(
        &self,
        identifier: &LoginIdentifier,
        password: &str,
    ) -> Result<LoginResult, DomainError> {
        let user = match identifier {
            LoginIdentifier::Email(email) => self.users.find_by_email(email).await?,
            LoginIdentifier::MobileNumber(mobile) => {
                self.users.find_by_mobile_number(mobile).await?
            }
        }
        .ok_or_else(|| {
            warn!("Login failed: no user for identifier");
            DomainError::InvalidCredentials
        })?;

        if !user.is_active {
            warn!(user_id = user.id, "Login failed: user not active");
            return Err(DomainError::UserNotActive);
        }

        let credential = self
            .credentials
            .find_by_user_id(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = user.id, "Login failed: no stored credential");
                DomainError::InvalidCredentials
            })?;

        let valid = PasswordService::verify(password, &credential.salt, &credential.password_hash)?;
        if !valid {
            warn!(user_id = user.id, "Login failed: password mismatch");
            return Err(DomainError::InvalidCredentials);
        }

        let token = self.token_service.issue(user.id, self.token_ttl).await?;

        // Best effort; a failed timestamp update must not fail the login.
        if let Err(e) = self.users.update_last_login(user.id, Utc::now()).await {
            error!(user_id = user.id, error = %e, "Failed to update last login");
        }

        info!(user_id = user.id, "Login successful");
        Ok(LoginResult { token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Subscription, Tenant, UserCredential, UserSubscriptionMapping,
        UserTenantMapping};
    use crate::repositories::credential_repository::MockCredentialRepository;
    use crate::repositories::subscription_repository::{
        MockSubscriptionRepository, MockUserSubscriptionMappingRepository,
    };
    use crate::repositories::tenant_repository::{
        MockTenantRepository, MockUserTenantMappingRepository,
    };
    use crate::repositories::token_repository::MockTokenRepository;
    use crate::repositories::user_repository::MockUserRepository;

    fn user(id: i64, email: &str, is_active: bool) -> User {
        User {
            id,
            email: email.to_string(),
            name: "Alice".to_string(),
            mobile_number: "1234567890".to_string(),
            country_id: None,
            user_type: UserType::Client,
            is_active,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn tenant(id: i64, company_name: &str) -> Tenant {
        Tenant {
            id,
            company_guid: format!("guid-{id}"),
            company_name: company_name.to_string(),
            host: "localhost".to_string(),
            bmrm_port: 0,
            sg_biz_port: 0,
            tally_sync_port: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn subscription(id: i32, code: &str) -> Subscription {
        Subscription {
            id,
            name: code.to_string(),
            code: code.to_string(),
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

    struct Mocks {
        users: MockUserRepository,
        credentials: MockCredentialRepository,
        tenants: MockTenantRepository,
        tenant_mappings: MockUserTenantMappingRepository,
        subscriptions: MockSubscriptionRepository,
        subscription_mappings: MockUserSubscriptionMappingRepository,
        tokens: MockTokenRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                users: MockUserRepository::new(),
                credentials: MockCredentialRepository::new(),
                tenants: MockTenantRepository::new(),
                tenant_mappings: MockUserTenantMappingRepository::new(),
                subscriptions: MockSubscriptionRepository::new(),
                subscription_mappings: MockUserSubscriptionMappingRepository::new(),
                tokens: MockTokenRepository::new(),
            }
        }

        fn into_service(self) -> AuthService {
            AuthService::new(
                Arc::new(self.users),
                Arc::new(self.credentials),
                Arc::new(self.tenants),
                Arc::new(self.tenant_mappings),
                Arc::new(self.subscriptions),
                Arc::new(self.subscription_mappings),
                Arc::new(TokenService::new(Arc::new(self.tokens))),
                Duration::hours(72),
            )
        }
    }

    fn registration() -> NewRegistration {
        NewRegistration {
            email: "alice@x.com".to_string(),
            name: "Alice".to_string(),
            mobile_number: "1234567890".to_string(),
            country_id: None,
            user_type: UserType::Client,
            password: "pass1".to_string(),
        }
    }

    #[test]
    fn test_identifier_classification() {
        assert_eq!(
            LoginIdentifier::classify("alice@x.com"),
            Some(LoginIdentifier::Email("alice@x.com".to_string()))
        );
        assert_eq!(
            LoginIdentifier::classify("1234567890"),
            Some(LoginIdentifier::MobileNumber("1234567890".to_string()))
        );
        assert_eq!(LoginIdentifier::classify("neither"), None);
    }

    #[tokio::test]
    async fn test_register_bootstraps_default_tenant_and_demo_subscription() {
        let mut mocks = Mocks::new();
        mocks
            .tenants
            .expect_find_by_company_name()
            .withf(|name| name == DEFAULT_TENANT_COMPANY_NAME)
            .returning(|_| Ok(Some(tenant(11, DEFAULT_TENANT_COMPANY_NAME))));
        mocks
            .subscriptions
            .expect_find_by_code()
            .withf(|code| code == DEMO_SUBSCRIPTION_CODE)
            .returning(|_| Ok(Some(subscription(3, DEMO_SUBSCRIPTION_CODE))));
        mocks
            .users
            .expect_create()
            .returning(|new| Ok(user(1, &new.email, true)));
        mocks.credentials.expect_create().returning(|c| {
            Ok(UserCredential {
                id: 1,
                user_id: c.user_id,
                password_hash: c.password_hash.clone(),
                salt: c.salt.clone(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        });
        mocks
            .tenant_mappings
            .expect_create()
            .withf(|m| m.user_id == 1 && m.tenant_id == 11)
            .returning(|m| {
                Ok(UserTenantMapping {
                    id: 1,
                    user_id: m.user_id,
                    tenant_id: m.tenant_id,
                })
            });
        mocks
            .subscription_mappings
            .expect_create()
            .withf(|m| m.user_id == 1 && m.subscription_id == 3)
            .returning(|m| {
                Ok(UserSubscriptionMapping {
                    id: 1,
                    user_id: m.user_id,
                    subscription_id: m.subscription_id,
                })
            });

        let created = mocks.into_service().register(&registration()).await.unwrap();
        assert_eq!(created.email, "alice@x.com");
    }

    #[tokio::test]
    async fn test_register_fails_when_demo_subscription_missing() {
        let mut mocks = Mocks::new();
        mocks
            .tenants
            .expect_find_by_company_name()
            .returning(|_| Ok(Some(tenant(11, DEFAULT_TENANT_COMPANY_NAME))));
        mocks
            .subscriptions
            .expect_find_by_code()
            .returning(|_| Ok(None));

        let err = mocks.into_service().register(&registration()).await.unwrap_err();
        assert!(matches!(err, DomainError::BootstrapEntitlementMissing(_)));
    }

    #[tokio::test]
    async fn test_register_removes_user_when_credential_insert_fails() {
        let mut mocks = Mocks::new();
        mocks
            .tenants
            .expect_find_by_company_name()
            .returning(|_| Ok(Some(tenant(11, DEFAULT_TENANT_COMPANY_NAME))));
        mocks
            .subscriptions
            .expect_find_by_code()
            .returning(|_| Ok(Some(subscription(3, DEMO_SUBSCRIPTION_CODE))));
        mocks
            .users
            .expect_create()
            .returning(|new| Ok(user(1, &new.email, true)));
        mocks
            .credentials
            .expect_create()
            .returning(|_| Err(DomainError::DatabaseError("connection reset".to_string())));
        mocks
            .users
            .expect_delete()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|_| Ok(()));

        let err = mocks.into_service().register(&registration()).await.unwrap_err();
        assert!(matches!(err, DomainError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_login_issues_token_for_valid_credentials() {
        let mut mocks = Mocks::new();
        mocks
            .users
            .expect_find_by_email()
            .returning(|email| Ok(Some(user(1, email, true))));
        mocks
            .credentials
            .expect_find_by_user_id()
            .returning(|user_id| Ok(Some(credential_for(user_id, "pass1"))));
        mocks.tokens.expect_create().returning(|t| {
            Ok(Token {
                id: 1,
                user_id: t.user_id,
                value: t.value,
                expiry: t.expiry,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        });
        mocks
            .users
            .expect_update_last_login()
            .returning(|_, _| Ok(()));

        let identifier = LoginIdentifier::Email("alice@x.com".to_string());
        let result = mocks.into_service().login(&identifier, "pass1").await.unwrap();
        assert_eq!(result.user.id, 1);
        assert!(result.token.expiry > Utc::now() + Duration::hours(71));
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let mut mocks = Mocks::new();
        mocks
            .users
            .expect_find_by_email()
            .returning(|email| Ok(Some(user(1, email, true))));
        mocks
            .credentials
            .expect_find_by_user_id()
            .returning(|user_id| Ok(Some(credential_for(user_id, "pass1"))));

        let identifier = LoginIdentifier::Email("alice@x.com".to_string());
        let err = mocks
            .into_service()
            .login(&identifier, "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_rejects_inactive_user() {
        let mut mocks = Mocks::new();
        mocks
            .users
            .expect_find_by_mobile_number()
            .returning(|_| Ok(Some(user(1, "alice@x.com", false))));

        let identifier = LoginIdentifier::MobileNumber("1234567890".to_string());
        let err = mocks
            .into_service()
            .login(&identifier, "pass1")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UserNotActive));
    }
}
