//! Role administration: tenant-scoped CRUD with permission grants.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use bizdesk_core::error::AppError;
use bizdesk_core::events::{EventBus, PushEvent};
use bizdesk_core::result::AppResult;
use bizdesk_core::types::pagination::{PageRequest, PageResponse};
use bizdesk_database::repositories::permission::PermissionRepository;
use bizdesk_database::repositories::role::RoleRepository;
use bizdesk_entity::permission::Permission;
use bizdesk_entity::role::{Role, RoleChange};

use crate::activity::ActivityRecorder;
use crate::context::RequestContext;

/// Data for creating or updating a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleInput {
    /// Role name, unique within the business.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Permission grants.
    #[serde(default)]
    pub permission_ids: Vec<Uuid>,
}

/// A role together with its granted permissions, for detail views.
#[derive(Debug, Clone, Serialize)]
pub struct RoleDetail {
    /// The role itself.
    #[serde(flatten)]
    pub role: Role,
    /// Permissions granted to the role.
    pub permissions: Vec<Permission>,
}

/// Handles role administration within a business.
#[derive(Debug, Clone)]
pub struct RoleService {
    roles: Arc<RoleRepository>,
    permissions: Arc<PermissionRepository>,
    events: EventBus,
    activity: ActivityRecorder,
}

impl RoleService {
    /// Creates a new role service.
    pub fn new(
        roles: Arc<RoleRepository>,
        permissions: Arc<PermissionRepository>,
        events: EventBus,
        activity: ActivityRecorder,
    ) -> Self {
        Self {
            roles,
            permissions,
            events,
            activity,
        }
    }

    /// The global permission catalog.
    pub async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.permissions.find_all().await
    }

    /// List roles of the caller's business.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Role>> {
        self.roles.find_all(ctx.business_id, page).await
    }

    /// Fetch a role with its granted permissions.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<RoleDetail> {
        let role = self
            .roles
            .find_by_id(ctx.business_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))?;
        let permissions = self.permissions.find_for_role(role.id).await?;
        Ok(RoleDetail { role, permissions })
    }

    /// Create a role with its permission grants.
    pub async fn create(&self, ctx: &RequestContext, req: RoleInput) -> AppResult<RoleDetail> {
        self.validate_input(ctx, &req, None).await?;

        let role = self
            .roles
            .create(&RoleChange {
                business_id: ctx.business_id,
                name: req.name,
                description: req.description,
                permission_ids: req.permission_ids,
            })
            .await?;

        let detail = RoleDetail {
            permissions: self.permissions.find_for_role(role.id).await?,
            role,
        };
        self.notify(ctx, "role:created", &detail).await;
        info!(role_id = %detail.role.id, created_by = %ctx.user_id, "Role created");
        Ok(detail)
    }

    /// Update a role and replace its permission grants.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: RoleInput,
    ) -> AppResult<RoleDetail> {
        // Existence first so a missing role reads as 404, not 422.
        self.roles
            .find_by_id(ctx.business_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))?;
        self.validate_input(ctx, &req, Some(id)).await?;

        let role = self
            .roles
            .update(
                id,
                &RoleChange {
                    business_id: ctx.business_id,
                    name: req.name,
                    description: req.description,
                    permission_ids: req.permission_ids,
                },
            )
            .await?;

        let detail = RoleDetail {
            permissions: self.permissions.find_for_role(role.id).await?,
            role,
        };
        self.notify(ctx, "role:updated", &detail).await;
        Ok(detail)
    }

    /// Delete a role. Refused while any user still holds it.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        self.roles
            .find_by_id(ctx.business_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))?;

        if self.roles.is_assigned(ctx.business_id, id).await? {
            return Err(AppError::unprocessable(
                "Role is still assigned to one or more users",
            ));
        }

        self.roles.delete(ctx.business_id, id).await?;

        self.activity
            .success(ctx, "role:deleted", Some(serde_json::json!({ "id": id })))
            .await;
        self.events.publish(PushEvent::new(
            ctx.user_id,
            "role:deleted",
            serde_json::json!({ "id": id }),
        ));
        info!(role_id = %id, deleted_by = %ctx.user_id, "Role deleted");
        Ok(())
    }

    async fn validate_input(
        &self,
        ctx: &RequestContext,
        req: &RoleInput,
        exclude: Option<Uuid>,
    ) -> AppResult<()> {
        if self
            .roles
            .name_in_use(ctx.business_id, &req.name, exclude)
            .await?
        {
            return Err(AppError::unprocessable("Role name is already in use"));
        }

        if !req.permission_ids.is_empty() {
            let found = self.permissions.count_existing(&req.permission_ids).await?;
            if found as usize != req.permission_ids.len() {
                return Err(AppError::unprocessable(
                    "One or more permissions do not exist",
                ));
            }
        }
        Ok(())
    }

    async fn notify(&self, ctx: &RequestContext, event: &str, detail: &RoleDetail) {
        let data = serde_json::to_value(detail).unwrap_or(serde_json::Value::Null);
        self.activity.success(ctx, event, Some(data.clone())).await;
        self.events
            .publish(PushEvent::new(ctx.user_id, event, data));
    }
}
