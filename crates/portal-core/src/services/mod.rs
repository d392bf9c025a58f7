//! Domain services
//!
//! Each service receives the repository ports it needs at construction
//! time; nothing reaches into ambient global state.

pub mod auth_service;
pub mod entitlement_service;
pub mod tenant_service;
pub mod token_service;
pub mod user_service;

pub use auth_service::{AuthService, LoginIdentifier, LoginResult, NewRegistration};
pub use entitlement_service::{EntitlementService, FeatureUpdate, SubscriptionUpdate};
pub use tenant_service::{TenantService, TenantUpdate};
pub use token_service::TokenService;
pub use user_service::{UserService, UserUpdate};
