//! Subscription gate for the validator.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use ezemailer_core::entitlement::Entitlement;
use ezemailer_core::error::CoreError;
use ezemailer_db::repositories::SubscriptionRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Resolve the caller's entitlement from their subscriptions.
pub async fn resolve_entitlement(
    state: &AppState,
    user: &AuthUser,
) -> Result<Entitlement, AppError> {
    let active = SubscriptionRepo::has_active_for_user(&state.pool, user.user_id).await?;
    Ok(Entitlement::from_subscription(active))
}

/// Requires an authenticated user with an active subscription.
/// Rejects with 402 Payment Required otherwise.
///
/// ```ignore
/// async fn validator_only(RequireEntitlement(user): RequireEntitlement) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireEntitlement(pub AuthUser);

impl FromRequestParts<AppState> for RequireEntitlement {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !resolve_entitlement(state, &user).await?.is_active() {
            return Err(AppError::Core(CoreError::EntitlementRequired(
                "An active plan is required to use the template validator".into(),
            )));
        }
        Ok(RequireEntitlement(user))
    }
}
