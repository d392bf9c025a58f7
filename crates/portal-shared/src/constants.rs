//! Application-wide constants

/// Request header carrying the bearer token value.
pub const TOKEN_HEADER: &str = "Token";

/// Request header carrying the external company identifier.
pub const COMPANY_GUID_HEADER: &str = "X-Company-Guid";

/// Lifetime of a login token, in hours.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 72;

/// Salt size in bytes (128 bits).
pub const SALT_SIZE_BYTES: usize = 16;

/// Reserved company name every new user is mapped into at registration.
pub const DEFAULT_TENANT_COMPANY_NAME: &str = "default";

/// Reserved subscription code granted to every new user at registration.
pub const DEMO_SUBSCRIPTION_CODE: &str = "demo";
