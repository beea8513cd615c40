//! Activity log repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use bizdesk_core::error::{AppError, ErrorKind};
use bizdesk_core::result::AppResult;
use bizdesk_core::types::pagination::{PageRequest, PageResponse};
use bizdesk_entity::activity::{ActivityLog, NewActivity};

/// Repository for the append-only audit trail.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    /// Create a new activity repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an activity row.
    pub async fn insert(&self, entry: &NewActivity) -> AppResult<ActivityLog> {
        sqlx::query_as::<_, ActivityLog>(
            "INSERT INTO activity_log (business_id, user_id, action, status, message, context) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(entry.business_id)
        .bind(entry.user_id)
        .bind(&entry.action)
        .bind(&entry.status)
        .bind(&entry.message)
        .bind(&entry.context)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to write activity log", e))
    }

    /// List a business's activity, newest first.
    pub async fn find_all(
        &self,
        business_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ActivityLog>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM activity_log WHERE business_id = $1")
                .bind(business_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count activity", e)
                })?;

        let entries = sqlx::query_as::<_, ActivityLog>(
            "SELECT * FROM activity_log WHERE business_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(business_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list activity", e))?;

        Ok(PageResponse::new(
            entries,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
