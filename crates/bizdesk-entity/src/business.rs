//! Business (tenant) entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A business is the tenant boundary: every user and role belongs to
/// exactly one business, and all queries are scoped to it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    /// Unique business identifier.
    pub id: Uuid,
    /// Deactivated businesses cannot authenticate; deactivation is a soft
    /// flag, never a delete.
    pub is_active: bool,
    /// Display name.
    pub name: String,
    /// Postal address.
    pub address: Option<String>,
    /// When the business was created.
    pub created_at: DateTime<Utc>,
    /// When the business was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}
