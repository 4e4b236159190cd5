//! Handler for the dashboard overview: plans, features and navigation.

use axum::extract::State;
use axum::Json;
use ezemailer_core::entitlement::{
    nav_links, Entitlement, Feature, NavLink, Plan, IMPLEMENTED_FEATURES, PLANS,
    UPCOMING_FEATURES,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::entitlement::resolve_entitlement;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub entitlement: Entitlement,
    pub nav_links: Vec<NavLink>,
    pub plans: &'static [Plan],
    pub implemented_features: &'static [Feature],
    pub upcoming_features: &'static [Feature],
}

/// GET /api/v1/dashboard
pub async fn overview(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardResponse>>> {
    let entitlement = resolve_entitlement(&state, &auth).await?;

    Ok(Json(DataResponse {
        data: DashboardResponse {
            entitlement,
            nav_links: nav_links(entitlement),
            plans: PLANS,
            implemented_features: IMPLEMENTED_FEATURES,
            upcoming_features: UPCOMING_FEATURES,
        },
    }))
}
