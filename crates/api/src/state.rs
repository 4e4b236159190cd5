use std::sync::Arc;

use ezemailer_core::payment::PaymentProvider;
use ezemailer_db::store::TemplateStore;

use crate::config::ServerConfig;
use crate::lifecycle::TemplateLifecycle;
use crate::middleware::rate_limit::IngestRateLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind an `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub pool: ezemailer_db::DbPool,
    pub config: Arc<ServerConfig>,
    pub templates: Arc<dyn TemplateStore>,
    pub payments: Arc<dyn PaymentProvider>,
    pub ingest_limiter: Arc<IngestRateLimiter>,
}

impl AppState {
    /// Lifecycle controller over the configured template store.
    pub fn lifecycle(&self) -> TemplateLifecycle {
        TemplateLifecycle::new(Arc::clone(&self.templates), self.config.max_upload_bytes)
    }
}
