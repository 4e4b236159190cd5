//! Liveness and readiness for load balancers and the dashboard status badge.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::config::ServerConfig;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database cannot be reached.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub uploads: UploadLimits,
}

/// Upload limits clients need before posting a document.
#[derive(Serialize)]
pub struct UploadLimits {
    pub max_bytes: usize,
    pub requests_per_window: u32,
    pub window_secs: u64,
}

impl From<&ServerConfig> for UploadLimits {
    fn from(config: &ServerConfig) -> Self {
        Self {
            max_bytes: config.max_upload_bytes,
            requests_per_window: config.ingest_rate_limit,
            window_secs: config.ingest_rate_window_secs,
        }
    }
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = ezemailer_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Health check could not reach the database");
    }

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        uploads: UploadLimits::from(state.config.as_ref()),
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
