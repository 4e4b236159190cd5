//! Razorpay REST client.
//!
//! Uses HTTP basic auth with the key id and secret. Only the two calls the
//! checkout flow needs are implemented: order creation and payment capture.

use async_trait::async_trait;
use ezemailer_core::payment::{
    is_valid_payment_id, PaymentCapture, PaymentError, PaymentOrder, PaymentProvider,
};
use serde::{Deserialize, Serialize};

use crate::config::PaymentConfig;

pub struct RazorpayClient {
    http: reqwest::Client,
    config: PaymentConfig,
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Deserialize)]
struct OrderBody {
    id: String,
    amount: i64,
    currency: String,
    receipt: Option<String>,
    status: String,
}

#[derive(Serialize)]
struct CaptureBody<'a> {
    amount: i64,
    currency: &'a str,
}

#[derive(Deserialize)]
struct PaymentBody {
    id: String,
    status: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    description: Option<String>,
}

impl RazorpayClient {
    pub fn new(config: PaymentConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.api_base.trim_end_matches('/'))
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, PaymentError> {
        let response = self
            .http
            .post(self.url(path))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(body)
            .send()
            .await
            .map_err(|e| PaymentError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .ok()
                .and_then(|e| e.error.description)
                .unwrap_or_else(|| status.to_string());
            return Err(PaymentError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| PaymentError::Provider(format!("Invalid provider response: {e}")))
    }
}

#[async_trait]
impl PaymentProvider for RazorpayClient {
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentOrder, PaymentError> {
        let body = CreateOrderBody {
            amount: amount_minor,
            currency,
            receipt,
        };
        let order: OrderBody = self.post("orders", &body).await?;
        tracing::info!(order_id = %order.id, amount_minor, "Payment order created");
        Ok(PaymentOrder {
            id: order.id,
            amount: order.amount,
            currency: order.currency,
            receipt: order.receipt,
            status: order.status,
        })
    }

    async fn capture(
        &self,
        payment_id: &str,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentCapture, PaymentError> {
        if !is_valid_payment_id(payment_id) {
            return Err(PaymentError::Rejected {
                status: 400,
                message: "Invalid payment id".into(),
            });
        }
        let body = CaptureBody {
            amount: amount_minor,
            currency,
        };
        let payment: PaymentBody = self
            .post(&format!("payments/{payment_id}/capture"), &body)
            .await?;
        tracing::info!(payment_id = %payment.id, status = %payment.status, "Payment capture returned");
        Ok(PaymentCapture {
            id: payment.id,
            status: payment.status,
        })
    }
}
