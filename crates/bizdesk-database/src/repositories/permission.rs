//! Permission repository implementation.
//!
//! Carries the two lookups the permission gate runs in sequence: the
//! role ids held by a user, then the distinct permission names granted
//! to those roles.

use sqlx::PgPool;
use uuid::Uuid;

use bizdesk_core::error::{AppError, ErrorKind};
use bizdesk_core::result::AppResult;
use bizdesk_entity::permission::Permission;

/// Repository for the global permission catalog and grant lookups.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the full permission catalog.
    pub async fn find_all(&self) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>("SELECT * FROM permissions ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list permissions", e)
            })
    }

    /// How many of the given permission ids exist. Used to validate a
    /// grant list before writing it.
    pub async fn count_existing(&self, ids: &[Uuid]) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM permissions WHERE id = ANY($1)")
                .bind(ids)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count permissions", e)
                })?;

        Ok(count as u64)
    }

    /// Find a permission by its canonical name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>("SELECT * FROM permissions WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find permission", e)
            })
    }

    /// The role ids currently assigned to a user, restricted to roles
    /// of the given business. An assignment row pointing at a foreign
    /// tenant's role grants nothing.
    pub async fn role_ids_for_user(&self, business_id: Uuid, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar(
            "SELECT ur.role_id FROM user_roles ur \
             INNER JOIN roles r ON r.id = ur.role_id \
             WHERE ur.user_id = $1 AND r.business_id = $2",
        )
        .bind(user_id)
        .bind(business_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load user roles", e))
    }

    /// The distinct permission names granted to any of the given roles.
    pub async fn names_for_roles(&self, role_ids: &[Uuid]) -> AppResult<Vec<String>> {
        sqlx::query_scalar(
            "SELECT DISTINCT p.name FROM permissions p \
             INNER JOIN role_permissions rp ON rp.permission_id = p.id \
             WHERE rp.role_id = ANY($1)",
        )
        .bind(role_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load role permissions", e)
        })
    }

    /// The permissions granted to a single role, for role detail views.
    pub async fn find_for_role(&self, role_id: Uuid) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT p.* FROM permissions p \
             INNER JOIN role_permissions rp ON rp.permission_id = p.id \
             WHERE rp.role_id = $1 ORDER BY p.name ASC",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load role permissions", e)
        })
    }
}
