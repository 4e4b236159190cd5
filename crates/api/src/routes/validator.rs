use axum::routing::post;
use axum::Router;

use crate::handlers::validator;
use crate::state::AppState;

/// Routes mounted at `/validator`.
///
/// ```text
/// POST /upload  -> upload (requires active plan, multipart `file` or `html`)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/upload", post(validator::upload))
}
