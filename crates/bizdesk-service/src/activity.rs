//! Best-effort activity logging for mutations.

use std::sync::Arc;

use tracing::warn;

use bizdesk_database::repositories::activity::ActivityRepository;
use bizdesk_entity::activity::NewActivity;

use crate::context::RequestContext;

/// Writes audit rows for mutations.
///
/// Recording is best-effort: a failed insert is logged and swallowed so
/// an audit outage never fails the mutation it describes.
#[derive(Debug, Clone)]
pub struct ActivityRecorder {
    repo: Arc<ActivityRepository>,
}

impl ActivityRecorder {
    /// Creates a new recorder.
    pub fn new(repo: Arc<ActivityRepository>) -> Self {
        Self { repo }
    }

    /// Record a successful mutation.
    pub async fn success(
        &self,
        ctx: &RequestContext,
        action: &str,
        context: Option<serde_json::Value>,
    ) {
        self.record(ctx, action, "success", None, context).await;
    }

    /// Record an arbitrary outcome.
    pub async fn record(
        &self,
        ctx: &RequestContext,
        action: &str,
        status: &str,
        message: Option<String>,
        context: Option<serde_json::Value>,
    ) {
        let entry = NewActivity {
            business_id: ctx.business_id,
            user_id: ctx.user_id,
            action: action.to_string(),
            status: status.to_string(),
            message,
            context,
        };

        if let Err(e) = self.repo.insert(&entry).await {
            warn!(action, error = %e, "Failed to write activity log");
        }
    }
}
