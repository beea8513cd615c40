//! Role entity and its join relations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named bundle of permissions, scoped to one business.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Unique role identifier.
    pub id: Uuid,
    /// Owning business.
    pub business_id: Uuid,
    /// Role name, unique within the business.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
    /// When the role was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Composite-keyed assignment of a role to a user. No independent
/// lifecycle: rows are replaced wholesale when a user's roles change.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRole {
    /// The assigned user.
    pub user_id: Uuid,
    /// The assigned role.
    pub role_id: Uuid,
}

/// Composite-keyed grant of a permission to a role.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RolePermission {
    /// The granting role.
    pub role_id: Uuid,
    /// The granted permission.
    pub permission_id: Uuid,
}

/// Data required to insert or update a role.
#[derive(Debug, Clone)]
pub struct RoleChange {
    /// Owning business.
    pub business_id: Uuid,
    /// Role name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Permissions granted to the role.
    pub permission_ids: Vec<Uuid>,
}
