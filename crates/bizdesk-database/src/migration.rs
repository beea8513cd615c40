//! Database migration runner.

use sqlx::PgPool;
use tracing::info;

use bizdesk_core::error::{AppError, ErrorKind};

/// Run all pending database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running database migrations...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations completed");
    Ok(())
}

/// Drop the public schema and replay every migration from scratch.
/// Destroys all data; callers must confirm with the operator first.
pub async fn reset_database(pool: &PgPool) -> Result<(), AppError> {
    info!("Dropping schema and re-running migrations...");

    sqlx::query("DROP SCHEMA public CASCADE")
        .execute(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to drop schema", e))?;
    sqlx::query("CREATE SCHEMA public")
        .execute(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to recreate schema", e))?;

    run_migrations(pool).await
}
