//! Login, token refresh, and own-password changes.

use std::sync::Arc;

use tracing::info;

use bizdesk_auth::jwt::{JwtEncoder, TokenPair};
use bizdesk_auth::password::PasswordHasher;
use bizdesk_auth::session::Session;
use bizdesk_core::error::AppError;
use bizdesk_core::result::AppResult;
use bizdesk_database::repositories::user::UserRepository;
use bizdesk_entity::user::User;

use crate::activity::ActivityRecorder;
use crate::context::RequestContext;

/// Longest access-token TTL a client may request on refresh, in minutes.
const MAX_REFRESH_TTL_MINUTES: i64 = 10;

/// Handles credential login and token issuance.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: Arc<UserRepository>,
    hasher: Arc<PasswordHasher>,
    encoder: Arc<JwtEncoder>,
    activity: ActivityRecorder,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        users: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
        activity: ActivityRecorder,
    ) -> Self {
        Self {
            users,
            hasher,
            encoder,
            activity,
        }
    }

    /// Verify a credential pair and issue a token pair.
    ///
    /// All failures are domain rejections (422). Unknown credential and
    /// wrong password share one message; account-state rejections are
    /// explicit since they are actionable by an administrator.
    pub async fn login(&self, email_or_username: &str, password: &str) -> AppResult<(User, TokenPair)> {
        let user = self
            .users
            .find_by_login(email_or_username)
            .await?
            .ok_or_else(|| AppError::unprocessable("Invalid credentials"))?;

        let Some(hash) = user.password_hash.as_deref() else {
            return Err(AppError::unprocessable(
                "Account does not support password login",
            ));
        };

        let state = self
            .users
            .find_auth_state(user.id)
            .await?
            .ok_or_else(|| AppError::unprocessable("Invalid credentials"))?;
        if !state.business_is_active {
            return Err(AppError::unprocessable("Business is not active"));
        }

        if !self.hasher.verify_password(password, hash)? {
            return Err(AppError::unprocessable("Invalid credentials"));
        }

        if !state.user_is_active {
            return Err(AppError::unprocessable("User is not active"));
        }

        let pair = self.encoder.generate_token_pair(user.id, user.business_id)?;
        info!(user_id = %user.id, business_id = %user.business_id, "User logged in");

        Ok((user, pair))
    }

    /// Issue a fresh access token for an already-resolved refresh session.
    ///
    /// `expires_in_minutes` lets the client shorten the TTL, e.g. for
    /// handing the token to a short-lived embed. Values outside 1..=10
    /// are rejected.
    pub fn refresh(&self, session: Session, expires_in_minutes: Option<i64>) -> AppResult<String> {
        if let Some(minutes) = expires_in_minutes {
            if !(1..=MAX_REFRESH_TTL_MINUTES).contains(&minutes) {
                return Err(AppError::validation(format!(
                    "expiresIn must be between 1 and {MAX_REFRESH_TTL_MINUTES} minutes"
                )));
            }
        }

        let (token, _expires_at) = self.encoder.generate_access_token(
            session.user_id,
            session.business_id,
            expires_in_minutes,
        )?;
        Ok(token)
    }

    /// Change the caller's own password after verifying the current one.
    pub async fn change_own_password(
        &self,
        ctx: &RequestContext,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self
            .users
            .find_by_id(ctx.business_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let Some(hash) = user.password_hash.as_deref() else {
            return Err(AppError::unprocessable(
                "Account does not support password login",
            ));
        };

        if !self.hasher.verify_password(current_password, hash)? {
            return Err(AppError::unprocessable("Current password is incorrect"));
        }

        let new_hash = self.hasher.hash_password(new_password)?;
        self.users
            .update_password(ctx.business_id, ctx.user_id, &new_hash)
            .await?;

        self.activity.success(ctx, "user:password-change", None).await;
        info!(user_id = %ctx.user_id, "Password changed");
        Ok(())
    }
}
