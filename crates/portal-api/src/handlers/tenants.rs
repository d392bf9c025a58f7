//! Tenant handlers

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    http::StatusCode,
    Json,
};

use portal_core::domain::{NewTenant, NewUserTenantMapping, Tenant, TenantInfo, UserTenantMapping};
use portal_shared::constants::COMPANY_GUID_HEADER;
use portal_shared::{TenantId, UserId};

use crate::dto::{MapUsersRequest, TenantUpdateRequest};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/company/resolve
///
/// `Token` header (session middleware) plus `X-Company-Guid` header;
/// returns the tenant only when the caller is a confirmed member.
pub async fn resolve(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<TenantInfo>>, ApiError> {
    let company_guid = headers
        .get(COMPANY_GUID_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiError::BadRequest(format!("Missing {COMPANY_GUID_HEADER} header"))
        })?;

    let info = state.tenants.resolve_tenant(auth.user_id, company_guid).await?;
    Ok(Json(ApiResponse::success(info)))
}

/// GET /api/v1/tenants/user
pub async fn my_tenants(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Tenant>>>, ApiError> {
    let tenants = state.tenants.tenants_for_user(auth.user_id).await?;
    Ok(Json(ApiResponse::success(tenants)))
}

/// POST /api/v1/tenants
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewTenant>,
) -> Result<(StatusCode, Json<ApiResponse<Tenant>>), ApiError> {
    let tenant = state.tenants.create_tenant(&payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(tenant))))
}

/// GET /api/v1/tenants
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Tenant>>>, ApiError> {
    let tenants = state.tenants.list_tenants().await?;
    Ok(Json(ApiResponse::success(tenants)))
}

/// PUT /api/v1/tenants/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<TenantId>,
    Json(payload): Json<TenantUpdateRequest>,
) -> Result<Json<ApiResponse<Tenant>>, ApiError> {
    let tenant = state.tenants.update_tenant(id, &payload.into()).await?;
    Ok(Json(ApiResponse::success(tenant)))
}

/// POST /api/v1/tenants/{id}/users
pub async fn map_users(
    State(state): State<AppState>,
    Path(id): Path<TenantId>,
    Json(payload): Json<MapUsersRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<UserTenantMapping>>>), ApiError> {
    let mappings: Vec<NewUserTenantMapping> = payload
        .user_ids
        .iter()
        .map(|&user_id| NewUserTenantMapping {
            user_id,
            tenant_id: id,
        })
        .collect();

    let created = state.tenants.map_users_to_tenant(&mappings).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// DELETE /api/v1/tenants/{id}/users/{user_id}
pub async fn unmap_user(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(TenantId, UserId)>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.tenants.unmap_user_from_tenant(user_id, id).await?;
    Ok(Json(ApiResponse::success(())))
}
