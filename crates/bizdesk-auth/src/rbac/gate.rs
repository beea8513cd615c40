//! The permission gate: does this user hold this permission right now?
//!
//! Grants are read from the database on every check, so a role or
//! permission change takes effect on the next request without any
//! token reissue.

use std::collections::HashSet;

use uuid::Uuid;

use bizdesk_core::error::AppError;
use bizdesk_core::result::AppResult;
use bizdesk_database::repositories::permission::PermissionRepository;
use bizdesk_entity::permission::PermissionName;

/// Pure decision function over an already-loaded permission set.
///
/// `admin` satisfies any required permission, including names that are
/// not part of the seeded catalog.
pub fn evaluate(held: &HashSet<String>, required: &str) -> bool {
    held.contains(PermissionName::Admin.as_str()) || held.contains(required)
}

/// Checks a user's effective permissions against a required one.
#[derive(Debug, Clone)]
pub struct PermissionGate {
    permissions: PermissionRepository,
}

impl PermissionGate {
    /// Create a new permission gate.
    pub fn new(permissions: PermissionRepository) -> Self {
        Self { permissions }
    }

    /// Load the user's effective permission names.
    ///
    /// Two lookups: the user's role ids scoped to the business, then
    /// the distinct permission names granted to those roles. A user
    /// with no roles holds no permissions.
    pub async fn effective_permissions(
        &self,
        business_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<HashSet<String>> {
        let role_ids = self
            .permissions
            .role_ids_for_user(business_id, user_id)
            .await?;
        if role_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let names = self.permissions.names_for_roles(&role_ids).await?;
        Ok(names.into_iter().collect())
    }

    /// Require a permission, failing with an authorization error.
    pub async fn require(
        &self,
        business_id: Uuid,
        user_id: Uuid,
        required: PermissionName,
    ) -> AppResult<()> {
        let held = self.effective_permissions(business_id, user_id).await?;
        if evaluate(&held, required.as_str()) {
            Ok(())
        } else {
            tracing::debug!(%user_id, required = %required, "permission denied");
            Err(AppError::authorization("Forbidden"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_set_denies_everything() {
        let none = HashSet::new();
        assert!(!evaluate(&none, "user:read"));
        assert!(!evaluate(&none, "admin"));
    }

    #[test]
    fn exact_match_grants() {
        let set = held(&["user:read", "user:update"]);
        assert!(evaluate(&set, "user:read"));
        assert!(!evaluate(&set, "user:delete"));
    }

    #[test]
    fn admin_bypasses_any_permission() {
        let set = held(&["admin"]);
        assert!(evaluate(&set, "user:delete"));
        assert!(evaluate(&set, "report:export"));
        assert!(evaluate(&set, "some-future-permission"));
    }
}
