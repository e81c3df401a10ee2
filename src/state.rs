use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::integrations::{MetadataLookup, Notifier};
use crate::rate_limit::SubmissionRateLimiter;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    /// Real ClickUp client or a no-op, picked once at startup.
    pub metadata: Arc<dyn MetadataLookup>,
    /// Real webhook dispatcher or a no-op, picked once at startup.
    pub notifier: Arc<dyn Notifier>,
    pub submission_limiter: SubmissionRateLimiter,
}
