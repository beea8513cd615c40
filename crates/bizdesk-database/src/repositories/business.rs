//! Business (tenant) repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use bizdesk_core::error::{AppError, ErrorKind};
use bizdesk_core::result::AppResult;
use bizdesk_entity::business::Business;

/// Repository for tenant records.
#[derive(Debug, Clone)]
pub struct BusinessRepository {
    pool: PgPool,
}

impl BusinessRepository {
    /// Create a new business repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a business by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Business>> {
        sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find business", e))
    }

    /// Create a new business.
    pub async fn create(&self, name: &str, address: Option<&str>) -> AppResult<Business> {
        sqlx::query_as::<_, Business>(
            "INSERT INTO businesses (name, address) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create business", e))
    }

    /// Flip the soft active flag. Businesses are deactivated, not deleted.
    pub async fn set_active(&self, id: Uuid, active: bool) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE businesses SET is_active = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(active)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to update business", e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Business {id} not found")));
        }
        Ok(())
    }
}
