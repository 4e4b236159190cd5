//! Handlers for plan purchase: order creation and payment capture.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ezemailer_core::entitlement::{plan_for_amount, Entitlement, Plan};
use ezemailer_core::error::CoreError;
use ezemailer_core::payment::{
    is_valid_payment_id, to_minor_units, verify_payment_signature, PaymentError, PaymentOrder,
};
use ezemailer_db::models::subscription::CreateSubscription;
use ezemailer_db::repositories::SubscriptionRepo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Plan price in major currency units.
    pub amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct CapturePaymentRequest {
    #[serde(alias = "paymentId")]
    pub payment_id: String,
    pub amount: i64,
    #[serde(default, alias = "orderId")]
    pub order_id: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CaptureResponse {
    pub payment_id: String,
    pub status: String,
    pub plan: &'static str,
    pub entitlement: Entitlement,
}

fn plan_or_reject(amount: i64) -> AppResult<&'static Plan> {
    plan_for_amount(amount).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "No plan is offered for amount {amount}"
        )))
    })
}

/// POST /api/v1/payment/order
pub async fn create_order(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<PaymentOrder>>)> {
    let plan = plan_or_reject(input.amount)?;
    let receipt = format!("rcpt_{}_{}", auth.user_id, Uuid::new_v4().simple());

    let order = state
        .payments
        .create_order(
            to_minor_units(plan.amount),
            &state.config.payment.currency,
            &receipt,
        )
        .await?;
    tracing::info!(user_id = auth.user_id, order_id = %order.id, plan = plan.code, "Payment order created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: order })))
}

/// POST /api/v1/payment/capture
///
/// Capture a completed checkout. When the client forwards the checkout
/// signature it is verified before the provider is contacted. A captured
/// payment records a subscription, which activates the entitlement.
pub async fn capture(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CapturePaymentRequest>,
) -> AppResult<Json<DataResponse<CaptureResponse>>> {
    if !is_valid_payment_id(&input.payment_id) {
        return Err(AppError::BadRequest("Invalid payment id".into()));
    }
    let plan = plan_or_reject(input.amount)?;

    match (&input.order_id, &input.signature) {
        (Some(order_id), Some(signature)) => {
            if !verify_payment_signature(
                &state.config.payment.key_secret,
                order_id,
                &input.payment_id,
                signature,
            ) {
                tracing::warn!(user_id = auth.user_id, payment_id = %input.payment_id, "Payment signature mismatch");
                return Err(AppError::BadRequest("Invalid payment signature".into()));
            }
        }
        (None, None) => {}
        _ => {
            return Err(AppError::BadRequest(
                "order_id and signature must be sent together".into(),
            ));
        }
    }

    let currency = &state.config.payment.currency;
    let capture = state
        .payments
        .capture(&input.payment_id, to_minor_units(plan.amount), currency)
        .await?;
    if !capture.is_captured() {
        return Err(AppError::Payment(PaymentError::Rejected {
            status: StatusCode::PAYMENT_REQUIRED.as_u16(),
            message: format!("Payment status is '{}'", capture.status),
        }));
    }

    SubscriptionRepo::create(
        &state.pool,
        &CreateSubscription {
            user_id: auth.user_id,
            plan: plan.code.to_string(),
            amount: plan.amount,
            currency: currency.clone(),
            order_id: input.order_id.clone(),
            payment_id: capture.id.clone(),
            status: capture.status.clone(),
        },
    )
    .await?;
    tracing::info!(user_id = auth.user_id, payment_id = %capture.id, plan = plan.code, "Payment captured");

    Ok(Json(DataResponse {
        data: CaptureResponse {
            payment_id: capture.id,
            status: capture.status,
            plan: plan.code,
            entitlement: Entitlement::Active,
        },
    }))
}
