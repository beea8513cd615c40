//! `AuthUser` extractor — picks up the context the session middleware
//! attached to the request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use bizdesk_core::error::AppError;
use bizdesk_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller's context, available in handlers.
///
/// Requires the session middleware; a route reachable without it
/// rejects here with a 401.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError(AppError::authentication("Authentication token missing")))
    }
}
