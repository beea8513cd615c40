//! JWT token creation with per-class signing keys.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use bizdesk_core::config::AuthConfig;
use bizdesk_core::error::AppError;

use super::claims::{Claims, TokenClass};

/// Creates signed JWT access and refresh tokens.
///
/// Access and refresh tokens are signed with separate secrets so that
/// neither class can stand in for the other.
#[derive(Clone)]
pub struct JwtEncoder {
    access_key: EncodingKey,
    refresh_key: EncodingKey,
    /// Access token TTL in minutes.
    access_ttl_minutes: i64,
    /// Refresh token TTL in days.
    refresh_ttl_days: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .finish()
    }
}

/// Result of a successful token pair generation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl_minutes: config.access_ttl_minutes as i64,
            refresh_ttl_days: config.refresh_ttl_days as i64,
        }
    }

    /// Generates a new access + refresh token pair for the given user.
    pub fn generate_token_pair(
        &self,
        user_id: Uuid,
        business_id: Uuid,
    ) -> Result<TokenPair, AppError> {
        let (access_token, access_expires_at) =
            self.generate_access_token(user_id, business_id, None)?;

        let now = Utc::now();
        let refresh_expires_at = now + chrono::Duration::days(self.refresh_ttl_days);
        let refresh_claims = Claims {
            sub: user_id,
            biz: business_id,
            iat: now.timestamp(),
            exp: refresh_expires_at.timestamp(),
            token_type: TokenClass::Refresh,
        };

        let refresh_token = encode(&Header::default(), &refresh_claims, &self.refresh_key)
            .map_err(|e| AppError::internal(format!("Failed to encode refresh token: {e}")))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
        })
    }

    /// Generates a standalone access token (e.g. on refresh).
    ///
    /// `ttl_minutes` overrides the configured TTL when present; the
    /// refresh endpoint uses this for its `expiresIn` query parameter.
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        business_id: Uuid,
        ttl_minutes: Option<i64>,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let ttl = ttl_minutes.unwrap_or(self.access_ttl_minutes);
        let exp = now + chrono::Duration::minutes(ttl);

        let claims = Claims {
            sub: user_id,
            biz: business_id,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            token_type: TokenClass::Access,
        };

        let token = encode(&Header::default(), &claims, &self.access_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok((token, exp))
    }
}
