//! Permission entity and the fixed permission enumeration.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// An atomic named capability. Permissions are global (not tenant-scoped)
/// and the set is fixed at deploy time, seeded and reconciled by name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: Uuid,
    /// Globally unique permission name.
    pub name: String,
}

/// The deploy-time permission enumeration.
///
/// `Admin` is the superuser bypass: a role holding it satisfies any
/// permission check, including names outside this enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionName {
    /// Superuser bypass.
    Admin,
    /// Create users and roles.
    UserCreate,
    /// Read users and roles.
    UserRead,
    /// Update users and roles.
    UserUpdate,
    /// Delete users and roles.
    UserDelete,
}

impl PermissionName {
    /// All permissions seeded at migration time.
    pub const ALL: [PermissionName; 5] = [
        Self::Admin,
        Self::UserCreate,
        Self::UserRead,
        Self::UserUpdate,
        Self::UserDelete,
    ];

    /// The canonical permission name string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::UserCreate => "user:create",
            Self::UserRead => "user:read",
            Self::UserUpdate => "user:update",
            Self::UserDelete => "user:delete",
        }
    }
}

impl fmt::Display for PermissionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_canonical() {
        assert_eq!(PermissionName::Admin.as_str(), "admin");
        assert_eq!(PermissionName::UserCreate.as_str(), "user:create");
        assert_eq!(PermissionName::ALL.len(), 5);
    }
}
