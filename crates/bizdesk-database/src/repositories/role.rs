//! Role repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use bizdesk_core::error::{AppError, ErrorKind};
use bizdesk_core::result::AppResult;
use bizdesk_core::types::pagination::{PageRequest, PageResponse};
use bizdesk_entity::role::{Role, RoleChange};

/// Repository for role CRUD within a business.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new role repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a role by primary key within a business.
    pub async fn find_by_id(&self, business_id: Uuid, id: Uuid) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1 AND business_id = $2")
            .bind(id)
            .bind(business_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find role", e))
    }

    /// List roles of a business with pagination.
    pub async fn find_all(
        &self,
        business_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Role>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM roles WHERE business_id = $1")
            .bind(business_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count roles", e))?;

        let roles = sqlx::query_as::<_, Role>(
            "SELECT * FROM roles WHERE business_id = $1 ORDER BY name ASC LIMIT $2 OFFSET $3",
        )
        .bind(business_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list roles", e))?;

        Ok(PageResponse::new(
            roles,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Whether a role name is already used within the business.
    pub async fn name_in_use(
        &self,
        business_id: Uuid,
        name: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM roles \
             WHERE business_id = $1 AND name = $2 AND ($3::uuid IS NULL OR id <> $3)",
        )
        .bind(business_id)
        .bind(name)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check role name", e))?;

        Ok(count > 0)
    }

    /// How many of the given role ids exist within the business. Used to
    /// validate that a role-id list is entirely tenant-local.
    pub async fn count_existing(&self, business_id: Uuid, ids: &[Uuid]) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM roles WHERE business_id = $1 AND id = ANY($2)",
        )
        .bind(business_id)
        .bind(ids)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count roles", e))?;

        Ok(count as u64)
    }

    /// Whether any user of the business still holds this role.
    pub async fn is_assigned(&self, business_id: Uuid, role_id: Uuid) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_roles ur \
             INNER JOIN users u ON u.id = ur.user_id \
             WHERE ur.role_id = $1 AND u.business_id = $2",
        )
        .bind(role_id)
        .bind(business_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check role assignment", e)
        })?;

        Ok(count > 0)
    }

    /// Create a role and its permission grants in one transaction.
    pub async fn create(&self, data: &RoleChange) -> AppResult<Role> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let role = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (business_id, name, description) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.business_id)
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err)
                if db_err.constraint() == Some("roles_business_name_key") =>
            {
                AppError::unprocessable("Role name is already in use")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create role", e),
        })?;

        for permission_id in &data.permission_ids {
            sqlx::query("INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2)")
                .bind(role.id)
                .bind(permission_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to grant permission", e)
                })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok(role)
    }

    /// Update a role and replace its permission grants.
    pub async fn update(&self, role_id: Uuid, data: &RoleChange) -> AppResult<Role> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let role = sqlx::query_as::<_, Role>(
            "UPDATE roles SET name = $3, description = $4, updated_at = NOW() \
             WHERE id = $1 AND business_id = $2 RETURNING *",
        )
        .bind(role_id)
        .bind(data.business_id)
        .bind(&data.name)
        .bind(&data.description)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update role", e))?
        .ok_or_else(|| AppError::unprocessable("Role not found"))?;

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear permissions", e)
            })?;

        for permission_id in &data.permission_ids {
            sqlx::query("INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2)")
                .bind(role.id)
                .bind(permission_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to grant permission", e)
                })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok(role)
    }

    /// Delete a role and its permission grants. The caller is responsible
    /// for checking [`Self::is_assigned`] first.
    pub async fn delete(&self, business_id: Uuid, role_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1 AND business_id = $2")
            .bind(role_id)
            .bind(business_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete role", e))?;

        Ok(result.rows_affected() > 0)
    }
}
