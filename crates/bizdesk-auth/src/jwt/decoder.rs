//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use bizdesk_core::config::AuthConfig;
use bizdesk_core::error::AppError;

use super::claims::{Claims, TokenClass};

/// Validates JWT tokens against the per-class signing keys.
#[derive(Clone)]
pub struct JwtDecoder {
    access_key: DecodingKey,
    refresh_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            access_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_token(token, &self.access_key, TokenClass::Access)
    }

    /// Decodes and validates a refresh token string.
    pub fn decode_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_token(token, &self.refresh_key, TokenClass::Refresh)
    }

    /// Decode against the given key and require the given class.
    ///
    /// The client-facing message stays generic; the concrete failure is
    /// logged at debug level only.
    fn decode_token(
        &self,
        token: &str,
        key: &DecodingKey,
        expected: TokenClass,
    ) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(token, key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "token validation failed");
            AppError::authentication("Invalid or expired token")
        })?;

        if token_data.claims.token_type != expected {
            return Err(AppError::authentication("Invalid or expired token"));
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use bizdesk_core::config::AuthConfig;
    use uuid::Uuid;

    fn test_config() -> AuthConfig {
        AuthConfig {
            access_secret: "access-secret-for-tests".into(),
            refresh_secret: "refresh-secret-for-tests".into(),
            access_ttl_minutes: 5,
            refresh_ttl_days: 30,
            argon_memory_cost_kib: 65536,
            argon_time_cost: 3,
        }
    }

    #[test]
    fn round_trip_preserves_identity() {
        let config = test_config();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);

        let user_id = Uuid::new_v4();
        let business_id = Uuid::new_v4();
        let pair = encoder.generate_token_pair(user_id, business_id).unwrap();

        let access = decoder.decode_access_token(&pair.access_token).unwrap();
        assert_eq!(access.sub, user_id);
        assert_eq!(access.biz, business_id);
        assert_eq!(access.token_type, TokenClass::Access);

        let refresh = decoder.decode_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(refresh.sub, user_id);
        assert_eq!(refresh.token_type, TokenClass::Refresh);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let encoder = JwtEncoder::new(&test_config());
        let mut other = test_config();
        other.access_secret = "a-completely-different-secret".into();
        let decoder = JwtDecoder::new(&other);

        let pair = encoder
            .generate_token_pair(Uuid::new_v4(), Uuid::new_v4())
            .unwrap();
        assert!(decoder.decode_access_token(&pair.access_token).is_err());
    }

    #[test]
    fn token_classes_do_not_interchange() {
        let config = test_config();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);

        let pair = encoder
            .generate_token_pair(Uuid::new_v4(), Uuid::new_v4())
            .unwrap();

        // Verifying each class against the other's key fails, since the
        // secrets differ.
        assert!(decoder.decode_access_token(&pair.refresh_token).is_err());
        assert!(decoder.decode_refresh_token(&pair.access_token).is_err());
    }

    #[test]
    fn same_secret_still_rejects_wrong_class() {
        let mut config = test_config();
        config.refresh_secret = config.access_secret.clone();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);

        let pair = encoder
            .generate_token_pair(Uuid::new_v4(), Uuid::new_v4())
            .unwrap();
        assert!(decoder.decode_refresh_token(&pair.access_token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        use jsonwebtoken::{EncodingKey, Header, encode};

        let config = test_config();
        let decoder = JwtDecoder::new(&config);
        let now = chrono::Utc::now().timestamp();

        let claims = Claims {
            sub: Uuid::new_v4(),
            biz: Uuid::new_v4(),
            iat: now - 120,
            exp: now - 60, // beyond the 5s leeway
            token_type: TokenClass::Access,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.access_secret.as_bytes()),
        )
        .unwrap();

        assert!(decoder.decode_access_token(&token).is_err());
    }
}
