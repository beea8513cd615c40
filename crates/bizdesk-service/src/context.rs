//! Request context carrying the authenticated user and their business.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bizdesk_auth::Session;

/// Context for the current authenticated request.
///
/// Built by the session middleware and passed into service methods so
/// that every operation knows *who* is acting and in *which* business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The business the caller acts in. Every tenant-scoped query uses
    /// this, never an id from the request body.
    pub business_id: Uuid,
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(business_id: Uuid, user_id: Uuid) -> Self {
        Self {
            business_id,
            user_id,
            request_time: Utc::now(),
        }
    }
}

impl From<Session> for RequestContext {
    fn from(session: Session) -> Self {
        Self::new(session.business_id, session.user_id)
    }
}
