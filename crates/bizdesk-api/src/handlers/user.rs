//! User handlers — own profile plus guarded user administration.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::Validate;

use bizdesk_entity::permission::PermissionName;
use bizdesk_entity::user::User;

use crate::dto::request::{
    ChangePasswordRequest, CreateUserRequest, SetPasswordRequest, UpdateUserRequest,
};
use crate::dto::response::{MessageResponse, PaginatedResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/v1/user — the caller's own profile.
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<User>, ApiError> {
    let user = state.user_service.get(&auth, auth.user_id).await?;
    Ok(Json(user))
}

/// PUT /api/v1/user/password — change own password.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    req.validate().map_err(crate::error::validation_failed)?;
    state
        .auth_service
        .change_own_password(&auth, &req.current_password, &req.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password changed")))
}

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<User>>, ApiError> {
    state
        .permission_gate
        .require(auth.business_id, auth.user_id, PermissionName::UserRead)
        .await?;

    let page = state
        .user_service
        .list(&auth, &params.into_page_request())
        .await?;
    Ok(Json(page.into()))
}

/// GET /api/v1/users/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    state
        .permission_gate
        .require(auth.business_id, auth.user_id, PermissionName::UserRead)
        .await?;

    let user = state.user_service.get(&auth, id).await?;
    Ok(Json(user))
}

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    state
        .permission_gate
        .require(auth.business_id, auth.user_id, PermissionName::UserCreate)
        .await?;
    req.validate().map_err(crate::error::validation_failed)?;

    let user = state.user_service.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/v1/users/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    state
        .permission_gate
        .require(auth.business_id, auth.user_id, PermissionName::UserUpdate)
        .await?;
    req.validate().map_err(crate::error::validation_failed)?;

    let user = state.user_service.update(&auth, id, req.into()).await?;
    Ok(Json(user))
}

/// PUT /api/v1/users/{id}/password
pub async fn set_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .permission_gate
        .require(auth.business_id, auth.user_id, PermissionName::UserUpdate)
        .await?;
    req.validate().map_err(crate::error::validation_failed)?;

    state
        .user_service
        .set_password(&auth, id, &req.password)
        .await?;
    Ok(Json(MessageResponse::new("Password updated")))
}

/// DELETE /api/v1/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .permission_gate
        .require(auth.business_id, auth.user_id, PermissionName::UserDelete)
        .await?;

    state.user_service.delete(&auth, id).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}
