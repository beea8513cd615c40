//! Resolves a presented token into an authenticated session.
//!
//! Used by both the HTTP auth middleware and the websocket handshake,
//! which need the same checks but report failures differently (HTTP
//! status vs close code). The distinct error variants exist for that
//! reason.

use thiserror::Error;
use uuid::Uuid;

use bizdesk_core::error::AppError;
use bizdesk_database::repositories::user::UserRepository;

use crate::jwt::JwtDecoder;

/// An authenticated session: the user and the business they act in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// The authenticated user.
    pub user_id: Uuid,
    /// The business the user belongs to.
    pub business_id: Uuid,
}

/// Why session resolution failed.
///
/// Every variant except `Internal` means the caller is unauthenticated;
/// the split lets transports surface distinct close codes or clear
/// stale cookies on `InvalidToken` specifically.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No token was presented at all.
    #[error("Authentication token missing")]
    MissingToken,
    /// The token failed signature, expiry, or class validation.
    #[error("Invalid or expired token")]
    InvalidToken,
    /// The token verified but its subject no longer exists.
    #[error("User not found")]
    UserNotFound,
    /// The user's business has been deactivated.
    #[error("Business is not active")]
    BusinessInactive,
    /// The user account has been deactivated.
    #[error("User is not active")]
    UserInactive,
    /// Resolution itself failed (database unavailable, etc).
    #[error(transparent)]
    Internal(#[from] AppError),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Internal(inner) => inner,
            other => AppError::authentication(other.to_string()),
        }
    }
}

/// Resolves bearer tokens into sessions, checking token validity and
/// the live state of the user and business on every request.
#[derive(Debug, Clone)]
pub struct SessionResolver {
    decoder: JwtDecoder,
    users: UserRepository,
}

impl SessionResolver {
    /// Create a new resolver.
    pub fn new(decoder: JwtDecoder, users: UserRepository) -> Self {
        Self { decoder, users }
    }

    /// Resolve an access token, as presented on API requests.
    pub async fn resolve_access(&self, token: Option<&str>) -> Result<Session, SessionError> {
        let token = token.ok_or(SessionError::MissingToken)?;
        let claims = self
            .decoder
            .decode_access_token(token)
            .map_err(|_| SessionError::InvalidToken)?;
        self.resolve_subject(claims.sub).await
    }

    /// Resolve a refresh token, as presented on the refresh endpoint
    /// and the websocket handshake.
    pub async fn resolve_refresh(&self, token: Option<&str>) -> Result<Session, SessionError> {
        let token = token.ok_or(SessionError::MissingToken)?;
        let claims = self
            .decoder
            .decode_refresh_token(token)
            .map_err(|_| SessionError::InvalidToken)?;
        self.resolve_subject(claims.sub).await
    }

    /// Check the subject against current database state. Claims carry
    /// the business id too, but the authoritative tenant is whatever
    /// the user row points at now.
    async fn resolve_subject(&self, user_id: Uuid) -> Result<Session, SessionError> {
        let state = self
            .users
            .find_auth_state(user_id)
            .await?
            .ok_or(SessionError::UserNotFound)?;

        if !state.business_is_active {
            return Err(SessionError::BusinessInactive);
        }
        if !state.user_is_active {
            return Err(SessionError::UserInactive);
        }

        Ok(Session {
            user_id: state.user_id,
            business_id: state.business_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdesk_core::error::ErrorKind;

    #[test]
    fn session_errors_map_to_authentication() {
        for err in [
            SessionError::MissingToken,
            SessionError::InvalidToken,
            SessionError::UserNotFound,
            SessionError::BusinessInactive,
            SessionError::UserInactive,
        ] {
            let app: AppError = err.into();
            assert_eq!(app.kind, ErrorKind::Authentication);
        }
    }

    #[test]
    fn internal_errors_pass_through() {
        let err = SessionError::Internal(AppError::database("pool exhausted"));
        let app: AppError = err.into();
        assert_eq!(app.kind, ErrorKind::Database);
    }
}
