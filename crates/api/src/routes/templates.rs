//! Route definitions for the `/templates` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Routes mounted at `/templates`. All require an active plan.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create (draft)
/// GET    /{id}                      -> get
/// DELETE /{id}                      -> delete
/// POST   /{id}/upload               -> upload (multipart)
/// PUT    /{id}/content              -> replace_content (live edit)
/// GET    /{id}/download/{variant}   -> download (original | transformed)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(templates::list).post(templates::create))
        .route("/{id}", get(templates::get).delete(templates::delete))
        .route("/{id}/upload", post(templates::upload))
        .route("/{id}/content", put(templates::replace_content))
        .route("/{id}/download/{variant}", get(templates::download))
}
