//! User repository implementation.
//!
//! Everything except the login/session lookups takes an explicit
//! `business_id`; cross-tenant reads are impossible by construction.

use sqlx::PgPool;
use uuid::Uuid;

use bizdesk_core::error::{AppError, ErrorKind};
use bizdesk_core::result::AppResult;
use bizdesk_core::types::pagination::{PageRequest, PageResponse};
use bizdesk_entity::user::{NewUser, User, UserAuthState, UserUpdate};

/// Repository for user CRUD and authentication lookups.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key within a business.
    pub async fn find_by_id(&self, business_id: Uuid, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND business_id = $2")
            .bind(id)
            .bind(business_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Find a user by email or username for login. Not tenant-scoped:
    /// the credential itself identifies the tenant. Uniqueness is only
    /// per-business, so when the same credential exists in two tenants
    /// the oldest account wins, deterministically.
    pub async fn find_by_login(&self, email_or_username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1 OR username = $1 \
             ORDER BY created_at ASC, id ASC LIMIT 1",
        )
        .bind(email_or_username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find user by login", e)
        })
    }

    /// Load the minimal user/business state used during session
    /// resolution (one round trip, joined with the owning business).
    pub async fn find_auth_state(&self, user_id: Uuid) -> AppResult<Option<UserAuthState>> {
        sqlx::query_as::<_, UserAuthState>(
            "SELECT u.id AS user_id, u.business_id, \
                    u.is_active AS user_is_active, b.is_active AS business_is_active \
             FROM users u \
             INNER JOIN businesses b ON b.id = u.business_id \
             WHERE u.id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load auth state", e))
    }

    /// List users of a business with pagination.
    pub async fn find_all(
        &self,
        business_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE business_id = $1")
            .bind(business_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count users", e))?;

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE business_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(business_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))?;

        Ok(PageResponse::new(
            users,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Whether an email is already used within the business.
    pub async fn email_in_use(
        &self,
        business_id: Uuid,
        email: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users \
             WHERE business_id = $1 AND email = $2 AND ($3::uuid IS NULL OR id <> $3)",
        )
        .bind(business_id)
        .bind(email)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check email", e))?;

        Ok(count > 0)
    }

    /// Whether a username is already used within the business.
    pub async fn username_in_use(
        &self,
        business_id: Uuid,
        username: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users \
             WHERE business_id = $1 AND username = $2 AND ($3::uuid IS NULL OR id <> $3)",
        )
        .bind(business_id)
        .bind(username)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check username", e))?;

        Ok(count > 0)
    }

    /// Create a user and assign its roles in one transaction.
    pub async fn create(&self, data: &NewUser, role_ids: &[Uuid]) -> AppResult<User> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users \
                 (business_id, email, username, password_hash, first_name, last_name, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(data.business_id)
        .bind(&data.email)
        .bind(&data.username)
        .bind(&data.password_hash)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err)
                if db_err.constraint() == Some("users_business_email_key") =>
            {
                AppError::unprocessable("Email is already in use")
            }
            sqlx::Error::Database(db_err)
                if db_err.constraint() == Some("users_business_username_key") =>
            {
                AppError::unprocessable("Username is already in use")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })?;

        for role_id in role_ids {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
                .bind(user.id)
                .bind(role_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to assign role", e)
                })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok(user)
    }

    /// Update a user's profile and replace its role assignments.
    pub async fn update(
        &self,
        business_id: Uuid,
        data: &UserUpdate,
        role_ids: &[Uuid],
    ) -> AppResult<User> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET email = $3, username = $4, first_name = $5, last_name = $6, \
                              is_active = $7, updated_by = $8, updated_at = NOW() \
             WHERE id = $1 AND business_id = $2 RETURNING *",
        )
        .bind(data.id)
        .bind(business_id)
        .bind(&data.email)
        .bind(&data.username)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.is_active)
        .bind(data.updated_by)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update user", e))?
        .ok_or_else(|| AppError::unprocessable("User not found"))?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to clear roles", e))?;

        for role_id in role_ids {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
                .bind(user.id)
                .bind(role_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to assign role", e)
                })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok(user)
    }

    /// Update a user's password hash.
    pub async fn update_password(
        &self,
        business_id: Uuid,
        user_id: Uuid,
        password_hash: &str,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $3, updated_at = NOW() \
             WHERE id = $1 AND business_id = $2",
        )
        .bind(user_id)
        .bind(business_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update password", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::unprocessable("User not found"));
        }
        Ok(())
    }

    /// Flip a user's active flag.
    pub async fn set_active(
        &self,
        business_id: Uuid,
        user_id: Uuid,
        active: bool,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE users SET is_active = $3, updated_at = NOW() \
             WHERE id = $1 AND business_id = $2",
        )
        .bind(user_id)
        .bind(business_id)
        .bind(active)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update user", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User not found"));
        }
        Ok(())
    }

    /// Delete a user and its role assignments.
    pub async fn delete(&self, business_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND business_id = $2")
            .bind(user_id)
            .bind(business_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete user", e))?;

        Ok(result.rows_affected() > 0)
    }
}
