//! User administration: tenant-scoped CRUD with role assignment.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use bizdesk_auth::password::PasswordHasher;
use bizdesk_core::error::AppError;
use bizdesk_core::events::{EventBus, PushEvent};
use bizdesk_core::result::AppResult;
use bizdesk_core::types::pagination::{PageRequest, PageResponse};
use bizdesk_database::repositories::role::RoleRepository;
use bizdesk_database::repositories::user::UserRepository;
use bizdesk_entity::user::{NewUser, User, UserUpdate};

use crate::activity::ActivityRecorder;
use crate::context::RequestContext;

/// Data for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address, unique within the business.
    pub email: String,
    /// Login name. Setting one requires a password.
    pub username: Option<String>,
    /// Plaintext password; omitted for passwordless accounts.
    pub password: Option<String>,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: Option<String>,
    /// Roles to assign, all from the caller's business.
    #[serde(default)]
    pub role_ids: Vec<Uuid>,
}

/// Data for updating a user's profile and roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New email address.
    pub email: String,
    /// New login name.
    pub username: Option<String>,
    /// New first name.
    pub first_name: String,
    /// New last name.
    pub last_name: Option<String>,
    /// Whether the account stays active.
    pub is_active: bool,
    /// Replacement role set.
    #[serde(default)]
    pub role_ids: Vec<Uuid>,
}

/// Handles user administration within a business.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<UserRepository>,
    roles: Arc<RoleRepository>,
    hasher: Arc<PasswordHasher>,
    events: EventBus,
    activity: ActivityRecorder,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<UserRepository>,
        roles: Arc<RoleRepository>,
        hasher: Arc<PasswordHasher>,
        events: EventBus,
        activity: ActivityRecorder,
    ) -> Self {
        Self {
            users,
            roles,
            hasher,
            events,
            activity,
        }
    }

    /// List users of the caller's business.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        self.users.find_all(ctx.business_id, page).await
    }

    /// Fetch a single user.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(ctx.business_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Create a user with its role assignments.
    pub async fn create(&self, ctx: &RequestContext, req: CreateUser) -> AppResult<User> {
        if req.username.is_some() && req.password.is_none() {
            return Err(AppError::validation("A username requires a password"));
        }
        self.check_role_ids(ctx, &req.role_ids).await?;

        if self
            .users
            .email_in_use(ctx.business_id, &req.email, None)
            .await?
        {
            return Err(AppError::unprocessable("Email is already in use"));
        }
        if let Some(username) = req.username.as_deref() {
            if self
                .users
                .username_in_use(ctx.business_id, username, None)
                .await?
            {
                return Err(AppError::unprocessable("Username is already in use"));
            }
        }

        let password_hash = match req.password.as_deref() {
            Some(password) => Some(self.hasher.hash_password(password)?),
            None => None,
        };

        let user = self
            .users
            .create(
                &NewUser {
                    business_id: ctx.business_id,
                    email: req.email,
                    username: req.username,
                    password_hash,
                    first_name: req.first_name,
                    last_name: req.last_name,
                    created_by: Some(ctx.user_id),
                },
                &req.role_ids,
            )
            .await?;

        self.notify(ctx, "user:created", &user).await;
        info!(user_id = %user.id, created_by = %ctx.user_id, "User created");
        Ok(user)
    }

    /// Update a user's profile and replace its roles.
    pub async fn update(&self, ctx: &RequestContext, id: Uuid, req: UpdateUser) -> AppResult<User> {
        self.check_role_ids(ctx, &req.role_ids).await?;

        // Precheck uniqueness so the common conflict surfaces as a clean
        // message; the unique index still backstops races.
        if self
            .users
            .email_in_use(ctx.business_id, &req.email, Some(id))
            .await?
        {
            return Err(AppError::unprocessable("Email is already in use"));
        }
        if let Some(username) = req.username.as_deref() {
            if self
                .users
                .username_in_use(ctx.business_id, username, Some(id))
                .await?
            {
                return Err(AppError::unprocessable("Username is already in use"));
            }
        }

        let user = self
            .users
            .update(
                ctx.business_id,
                &UserUpdate {
                    id,
                    email: req.email,
                    username: req.username,
                    first_name: req.first_name,
                    last_name: req.last_name,
                    is_active: req.is_active,
                    updated_by: ctx.user_id,
                },
                &req.role_ids,
            )
            .await?;

        self.notify(ctx, "user:updated", &user).await;
        Ok(user)
    }

    /// Set another user's password without knowing the current one.
    pub async fn set_password(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        new_password: &str,
    ) -> AppResult<()> {
        let hash = self.hasher.hash_password(new_password)?;
        self.users
            .update_password(ctx.business_id, id, &hash)
            .await?;

        self.activity
            .success(ctx, "user:password-set", Some(serde_json::json!({ "id": id })))
            .await;
        self.events.publish(PushEvent::new(
            ctx.user_id,
            "user:password-set",
            serde_json::json!({ "id": id }),
        ));
        Ok(())
    }

    /// Delete a user. Deleting yourself is rejected.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        if id == ctx.user_id {
            return Err(AppError::unprocessable("You cannot delete your own account"));
        }

        if !self.users.delete(ctx.business_id, id).await? {
            return Err(AppError::not_found("User not found"));
        }

        self.activity
            .success(ctx, "user:deleted", Some(serde_json::json!({ "id": id })))
            .await;
        self.events.publish(PushEvent::new(
            ctx.user_id,
            "user:deleted",
            serde_json::json!({ "id": id }),
        ));
        info!(user_id = %id, deleted_by = %ctx.user_id, "User deleted");
        Ok(())
    }

    /// Every assigned role must exist in the caller's business.
    async fn check_role_ids(&self, ctx: &RequestContext, role_ids: &[Uuid]) -> AppResult<()> {
        if role_ids.is_empty() {
            return Ok(());
        }
        let found = self.roles.count_existing(ctx.business_id, role_ids).await?;
        if found as usize != role_ids.len() {
            return Err(AppError::unprocessable(
                "One or more roles do not exist in this business",
            ));
        }
        Ok(())
    }

    /// Audit + push for a mutation carrying the full entity.
    async fn notify(&self, ctx: &RequestContext, event: &str, user: &User) {
        let data = serde_json::to_value(user).unwrap_or(serde_json::Value::Null);
        self.activity.success(ctx, event, Some(data.clone())).await;
        self.events
            .publish(PushEvent::new(ctx.user_id, event, data));
    }
}