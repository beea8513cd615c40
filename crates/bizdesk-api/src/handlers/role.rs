//! Role and permission handlers.
//!
//! Roles reuse the `user:*` permission names for their guards; the
//! permission catalog is deliberately small.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::Validate;

use bizdesk_entity::permission::{Permission, PermissionName};
use bizdesk_entity::role::Role;
use bizdesk_service::role::RoleDetail;

use crate::dto::request::RoleRequest;
use crate::dto::response::{MessageResponse, PaginatedResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/v1/permissions
pub async fn list_permissions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Permission>>, ApiError> {
    state
        .permission_gate
        .require(auth.business_id, auth.user_id, PermissionName::UserRead)
        .await?;

    let permissions = state.role_service.list_permissions().await?;
    Ok(Json(permissions))
}

/// GET /api/v1/roles
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<Role>>, ApiError> {
    state
        .permission_gate
        .require(auth.business_id, auth.user_id, PermissionName::UserRead)
        .await?;

    let page = state
        .role_service
        .list(&auth, &params.into_page_request())
        .await?;
    Ok(Json(page.into()))
}

/// GET /api/v1/roles/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RoleDetail>, ApiError> {
    state
        .permission_gate
        .require(auth.business_id, auth.user_id, PermissionName::UserRead)
        .await?;

    let role = state.role_service.get(&auth, id).await?;
    Ok(Json(role))
}

/// POST /api/v1/roles
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RoleRequest>,
) -> Result<(StatusCode, Json<RoleDetail>), ApiError> {
    state
        .permission_gate
        .require(auth.business_id, auth.user_id, PermissionName::UserCreate)
        .await?;
    req.validate().map_err(crate::error::validation_failed)?;

    let role = state.role_service.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

/// PUT /api/v1/roles/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RoleRequest>,
) -> Result<Json<RoleDetail>, ApiError> {
    state
        .permission_gate
        .require(auth.business_id, auth.user_id, PermissionName::UserUpdate)
        .await?;
    req.validate().map_err(crate::error::validation_failed)?;

    let role = state.role_service.update(&auth, id, req.into()).await?;
    Ok(Json(role))
}

/// DELETE /api/v1/roles/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .permission_gate
        .require(auth.business_id, auth.user_id, PermissionName::UserDelete)
        .await?;

    state.role_service.delete(&auth, id).await?;
    Ok(Json(MessageResponse::new("Role deleted")))
}
