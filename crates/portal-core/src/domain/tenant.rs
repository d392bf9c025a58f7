//! Tenant entity and user-tenant membership

use chrono::{DateTime, Utc};
use portal_shared::{TenantId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    /// External-facing identifier; immutable and globally unique.
    pub company_guid: String,
    pub company_name: String,
    pub host: String,
    pub bmrm_port: i32,
    pub sg_biz_port: i32,
    pub tally_sync_port: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a tenant.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTenant {
    pub company_guid: String,
    pub company_name: String,
    pub host: String,
    pub bmrm_port: i32,
    pub sg_biz_port: i32,
    pub tally_sync_port: i32,
}

/// Membership row; (user_id, tenant_id) is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserTenantMapping {
    pub id: i64,
    pub user_id: UserId,
    pub tenant_id: TenantId,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NewUserTenantMapping {
    pub user_id: UserId,
    pub tenant_id: TenantId,
}

/// A tenant resolved for a confirmed member.
#[derive(Debug, Clone, Serialize)]
pub struct TenantInfo {
    pub user_id: UserId,
    pub tenant: Tenant,
}
