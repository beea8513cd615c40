//! Health check handler.

use axum::Json;
use serde::{Deserialize, Serialize};

/// Liveness response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` when the process can answer.
    pub status: String,
    /// Server version.
    pub version: String,
}

/// GET /health — unauthenticated liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
