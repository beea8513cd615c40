//! Route definitions for the BizDesk HTTP API.
//!
//! REST endpoints live under `/api/v1` behind the session middleware;
//! the websocket upgrade and health probe are mounted at the root.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/token", get(handlers::auth::refresh))
        .route("/logout", post(handlers::auth::logout))
        .route("/user", get(handlers::user::get_profile))
        .route("/user/password", put(handlers::user::change_password))
        .route(
            "/users",
            get(handlers::user::list).post(handlers::user::create),
        )
        .route(
            "/users/{id}",
            get(handlers::user::get)
                .put(handlers::user::update)
                .delete(handlers::user::delete),
        )
        .route("/users/{id}/password", put(handlers::user::set_password))
        .route("/permissions", get(handlers::role::list_permissions))
        .route(
            "/roles",
            get(handlers::role::list).post(handlers::role::create),
        )
        .route(
            "/roles/{id}",
            get(handlers::role::get)
                .put(handlers::role::update)
                .delete(handlers::role::delete),
        );

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api/v1", api)
        .route("/ws", get(handlers::ws::ws_upgrade))
        .route("/health", get(handlers::health::health))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::session,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
