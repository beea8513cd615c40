//! Session middleware: cookie-or-bearer token resolution for `/api/v1`.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use bizdesk_auth::session::SessionError;
use bizdesk_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Cookie carrying the access token.
pub const TOKEN_COOKIE: &str = "token";

/// Cookie carrying the refresh token, path-limited to the refresh
/// endpoint so it never rides along on ordinary API calls.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Path the refresh cookie is scoped to.
pub const REFRESH_COOKIE_PATH: &str = "/api/v1/token";

/// Paths that skip session resolution entirely, matched exactly.
const ALLOW_LIST: &[&str] = &["/api/v1/login", "/api/v1/token"];

/// Resolves the caller's session for every `/api/v1` request.
///
/// The `token` cookie wins over the `Authorization: Bearer` header when
/// both are present. On success a [`RequestContext`] is attached as a
/// request extension; on failure the request ends here with a 401, and
/// when the bad credential came from a cookie the response clears it so
/// browsers stop replaying it.
pub async fn session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if !path.starts_with("/api/v1") || ALLOW_LIST.contains(&path) {
        return next.run(request).await;
    }

    let (token, from_cookie) = match jar.get(TOKEN_COOKIE) {
        Some(cookie) => (Some(cookie.value().to_string()), true),
        None => (bearer_token(request.headers()), false),
    };

    match state
        .session_resolver
        .resolve_access(token.as_deref())
        .await
    {
        Ok(session) => {
            request
                .extensions_mut()
                .insert(RequestContext::from(session));
            next.run(request).await
        }
        Err(err) => {
            let clear_cookie = from_cookie && matches!(err, SessionError::InvalidToken);
            let error = ApiError::from(err);
            if clear_cookie {
                let jar = jar.remove(Cookie::build((TOKEN_COOKIE, "")).path("/").build());
                (jar, error).into_response()
            } else {
                error.into_response()
            }
        }
    }
}

/// The token from an `Authorization: Bearer` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}
