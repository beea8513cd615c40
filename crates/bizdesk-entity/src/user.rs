//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A back-office user belonging to exactly one business.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Owning business.
    pub business_id: Uuid,
    /// Inactive users cannot authenticate.
    pub is_active: bool,
    /// Email address, unique within the business.
    pub email: String,
    /// Login name, unique within the business.
    pub username: Option<String>,
    /// Argon2id password hash. `None` means password login is disabled
    /// for this account (provisioned for another auth method).
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: Option<String>,
    /// The user who created this record.
    pub created_by: Option<Uuid>,
    /// The user who last updated this record.
    pub updated_by: Option<Uuid>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether this account can log in with a password at all.
    pub fn has_password_login(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Data required to insert a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Owning business.
    pub business_id: Uuid,
    /// Email address.
    pub email: String,
    /// Login name (optional; implies a password).
    pub username: Option<String>,
    /// Pre-hashed password.
    pub password_hash: Option<String>,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: Option<String>,
    /// Creating user's ID. `None` only for seeded bootstrap accounts.
    pub created_by: Option<Uuid>,
}

/// Data for updating an existing user's profile.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    /// The user to update.
    pub id: Uuid,
    /// New email address.
    pub email: String,
    /// New login name.
    pub username: Option<String>,
    /// New first name.
    pub first_name: String,
    /// New last name.
    pub last_name: Option<String>,
    /// Whether the account is active.
    pub is_active: bool,
    /// Updating user's ID.
    pub updated_by: Uuid,
}

/// Minimal user/business state needed during session resolution.
#[derive(Debug, Clone, FromRow)]
pub struct UserAuthState {
    /// The user ID.
    pub user_id: Uuid,
    /// The owning business ID.
    pub business_id: Uuid,
    /// Whether the user is active.
    pub user_is_active: bool,
    /// Whether the owning business is active.
    pub business_is_active: bool,
}
