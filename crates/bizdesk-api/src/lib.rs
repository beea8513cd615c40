//! # bizdesk-api
//!
//! HTTP API layer for BizDesk built on Axum.
//!
//! Provides the REST endpoints under `/api/v1`, the websocket upgrade,
//! session middleware (cookie or bearer), permission guards, DTOs, and
//! error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
