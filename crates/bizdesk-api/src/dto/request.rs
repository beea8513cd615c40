//! Request DTOs. The JSON wire format is camelCase.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use bizdesk_service::role::RoleInput;
use bizdesk_service::user::{CreateUser, UpdateUser};

/// Login credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address or username.
    pub email_or_username: String,
    /// Plaintext password.
    pub password: String,
}

/// Login query flags.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginQuery {
    /// When true the tokens are also set as HttpOnly cookies.
    #[serde(default)]
    pub cookie: bool,
}

/// Refresh query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshQuery {
    /// Optional access-token TTL override in minutes (1–10).
    #[serde(rename = "expiresIn")]
    pub expires_in: Option<i64>,
}

/// Change the caller's own password.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// The current password, verified before the change.
    pub current_password: String,
    /// The new password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub new_password: String,
}

/// Set another user's password (admin path, no current password).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetPasswordRequest {
    /// The new password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Create a user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Email address.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Login name; requires a password.
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    pub username: Option<String>,
    /// Plaintext password; omit for passwordless accounts.
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: Option<String>,
    /// First name.
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    /// Last name.
    pub last_name: Option<String>,
    /// Roles to assign.
    #[serde(default)]
    pub role_ids: Vec<Uuid>,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            email: req.email,
            username: req.username,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            role_ids: req.role_ids,
        }
    }
}

/// Update a user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// New email address.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// New login name.
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    pub username: Option<String>,
    /// New first name.
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    /// New last name.
    pub last_name: Option<String>,
    /// Whether the account stays active.
    pub is_active: bool,
    /// Replacement role set.
    #[serde(default)]
    pub role_ids: Vec<Uuid>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            email: req.email,
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
            is_active: req.is_active,
            role_ids: req.role_ids,
        }
    }
}

/// Create or update a role.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequest {
    /// Role name.
    #[validate(
        length(max = 100, message = "Role name is too long"),
        custom(function = non_blank, message = "Role name cannot be empty")
    )]
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Permission grants.
    #[serde(default)]
    pub permission_ids: Vec<Uuid>,
}

impl From<RoleRequest> for RoleInput {
    fn from(req: RoleRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            permission_ids: req.permission_ids,
        }
    }
}

/// Rejects values that are empty or all whitespace.
fn non_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("non_blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_user(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            username: None,
            password: None,
            first_name: "Ada".to_string(),
            last_name: None,
            role_ids: Vec::new(),
        }
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for email in ["@", "a@", "not-an-email", " padded@x.io", ""] {
            assert!(create_user(email).validate().is_err(), "accepted {email:?}");
        }
        assert!(create_user("a@b.co").validate().is_ok());
    }

    #[test]
    fn blank_role_names_are_invalid() {
        for name in ["", "  "] {
            let req = RoleRequest {
                name: name.to_string(),
                description: None,
                permission_ids: Vec::new(),
            };
            assert!(req.validate().is_err(), "accepted {name:?}");
        }
    }
}
