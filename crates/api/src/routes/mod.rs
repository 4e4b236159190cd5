pub mod auth;
pub mod dashboard;
pub mod health;
pub mod payment;
pub mod templates;
pub mod validator;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                              signup (public)
/// /auth/login                               login (public)
/// /auth/refresh                             refresh (public)
/// /auth/logout                              logout (requires auth)
/// /auth/forgot                              request password reset (public)
/// /auth/reset                               reset password with token (public)
///
/// /dashboard                                plans, features, nav links (requires auth)
///
/// /payment/order                           create order (requires auth)
/// /payment/capture                         capture payment (requires auth)
///
/// /validator/upload                         transform an upload (requires plan)
///
/// /templates                                list, create draft (requires plan)
/// /templates/{id}                           get, delete
/// /templates/{id}/upload                    populate from upload
/// /templates/{id}/content                   live-edit save (PUT)
/// /templates/{id}/download/{variant}        download original or transformed
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes.
        .nest("/auth", auth::router())
        // Dashboard overview.
        .nest("/dashboard", dashboard::router())
        // Plan purchase.
        .nest("/payment", payment::router())
        // Stateless validator.
        .nest("/validator", validator::router())
        // Saved templates.
        .nest("/templates", templates::router())
}
