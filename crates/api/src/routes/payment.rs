//! Route definitions for the `/payment` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::payment;
use crate::state::AppState;

/// Routes mounted at `/payment`.
///
/// ```text
/// POST /order    -> create_order (requires auth)
/// POST /capture  -> capture (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/order", post(payment::create_order))
        .route("/capture", post(payment::capture))
}
