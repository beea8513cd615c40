//! Activity log entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An audit trail row written for every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    /// Unique log row identifier.
    pub id: Uuid,
    /// Business in which the action happened.
    pub business_id: Uuid,
    /// User who performed the action.
    pub user_id: Uuid,
    /// Action name, e.g. `user:create` or `role:delete`.
    pub action: String,
    /// Outcome, e.g. `success`.
    pub status: String,
    /// Optional human-readable message.
    pub message: Option<String>,
    /// Structured context payload.
    pub context: Option<serde_json::Value>,
    /// When the action happened.
    pub created_at: DateTime<Utc>,
}

/// Data required to insert an activity log row.
#[derive(Debug, Clone)]
pub struct NewActivity {
    /// Business in which the action happened.
    pub business_id: Uuid,
    /// User who performed the action.
    pub user_id: Uuid,
    /// Action name.
    pub action: String,
    /// Outcome.
    pub status: String,
    /// Optional message.
    pub message: Option<String>,
    /// Structured context payload.
    pub context: Option<serde_json::Value>,
}
