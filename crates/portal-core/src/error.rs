//! Domain errors

use portal_shared::{TenantId, UserId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("User not active")]
    UserNotActive,

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Mobile number already exists: {0}")]
    MobileNumberAlreadyExists(String),

    #[error("Token not found")]
    TokenNotFound,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Unknown tenant: {0}")]
    UnknownTenant(String),

    #[error("User {user_id} is not a member of tenant {tenant_id}")]
    NotAMember { user_id: UserId, tenant_id: TenantId },

    #[error("Tenant GUID already exists: {0}")]
    TenantGuidAlreadyExists(String),

    #[error("Feature not found")]
    FeatureNotFound,

    #[error("Subscription not found")]
    SubscriptionNotFound,

    #[error("Subscription history not found")]
    SubscriptionHistoryNotFound,

    #[error("Duplicate grant: {0}")]
    DuplicateGrant(String),

    #[error("Bootstrap entitlement missing: {0}")]
    BootstrapEntitlementMissing(String),

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Random source error: {0}")]
    RandomSourceError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<portal_security::PasswordError> for DomainError {
    fn from(err: portal_security::PasswordError) -> Self {
        match err {
            portal_security::PasswordError::RandomSource(msg) => DomainError::RandomSourceError(msg),
            portal_security::PasswordError::Hash(msg) => DomainError::PasswordHashError(msg),
        }
    }
}
