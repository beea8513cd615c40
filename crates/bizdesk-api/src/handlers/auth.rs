//! Auth handlers — login, token refresh, logout.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::dto::request::{LoginQuery, LoginRequest, RefreshQuery};
use crate::dto::response::{LoginResponse, MessageResponse, TokenResponse};
use crate::error::ApiError;
use crate::middleware::auth::{REFRESH_COOKIE, REFRESH_COOKIE_PATH, TOKEN_COOKIE, bearer_token};
use crate::state::AppState;

/// POST /api/v1/login
///
/// With `?cookie=true` the tokens are additionally set as HttpOnly
/// cookies; the refresh cookie is path-limited to the refresh endpoint.
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let (_user, pair) = state
        .auth_service
        .login(&req.email_or_username, &req.password)
        .await?;

    let jar = if query.cookie {
        jar.add(
            Cookie::build((TOKEN_COOKIE, pair.access_token.clone()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .build(),
        )
        .add(
            Cookie::build((REFRESH_COOKIE, pair.refresh_token.clone()))
                .path(REFRESH_COOKIE_PATH)
                .http_only(true)
                .same_site(SameSite::Lax)
                .build(),
        )
    } else {
        jar
    };

    Ok((
        jar,
        Json(LoginResponse {
            token: pair.access_token,
            refresh_token: pair.refresh_token,
        }),
    ))
}

/// GET /api/v1/token
///
/// Exchanges a refresh token (cookie or bearer) for a fresh access
/// token, re-checking that the user and business are still active.
pub async fn refresh(
    State(state): State<AppState>,
    Query(query): Query<RefreshQuery>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| bearer_token(&headers));

    let session = state
        .session_resolver
        .resolve_refresh(token.as_deref())
        .await?;
    let token = state.auth_service.refresh(session, query.expires_in)?;

    Ok(Json(TokenResponse { token }))
}

/// POST /api/v1/logout
///
/// Clears both auth cookies. Stateless tokens stay valid until expiry.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar
        .remove(Cookie::build((TOKEN_COOKIE, "")).path("/").build())
        .remove(
            Cookie::build((REFRESH_COOKIE, ""))
                .path(REFRESH_COOKIE_PATH)
                .build(),
        );

    (jar, Json(MessageResponse::new("Logged out")))
}
