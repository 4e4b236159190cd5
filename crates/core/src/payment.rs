//! Payment provider contract.
//!
//! Orders are created for a plan amount, the client completes checkout with
//! the provider, and the server captures the payment. A successful capture
//! is what grants the validator entitlement.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

/// Currency used when none is configured.
pub const DEFAULT_CURRENCY: &str = "INR";

/// Provider status of a captured payment.
pub const STATUS_CAPTURED: &str = "captured";

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Transport or decoding failure talking to the provider.
    #[error("Payment provider unavailable: {0}")]
    Provider(String),

    /// The provider answered but refused the request.
    #[error("Payment provider rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCapture {
    pub id: String,
    pub status: String,
}

impl PaymentCapture {
    pub fn is_captured(&self) -> bool {
        self.status == STATUS_CAPTURED
    }
}

/// A payment gateway. Amounts are in minor units (paise, cents).
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentOrder, PaymentError>;

    async fn capture(
        &self,
        payment_id: &str,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentCapture, PaymentError>;
}

/// Longest payment id accepted from clients.
pub const MAX_PAYMENT_ID_LEN: usize = 64;

/// Provider payment ids are opaque tokens like `pay_29QQoUBi66xm2f`. Anything
/// else is refused before it reaches a provider URL.
pub fn is_valid_payment_id(payment_id: &str) -> bool {
    !payment_id.is_empty()
        && payment_id.len() <= MAX_PAYMENT_ID_LEN
        && payment_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Convert a major-unit amount to minor units.
pub fn to_minor_units(amount: i64) -> i64 {
    amount * 100
}

// ---------------------------------------------------------------------------
// Checkout signature
// ---------------------------------------------------------------------------

type HmacSha256 = Hmac<Sha256>;

/// Compute the checkout signature the provider hands back to the client:
/// hex HMAC-SHA256 of `"{order_id}|{payment_id}"` keyed with the API secret.
pub fn compute_payment_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a checkout signature in constant time.
pub fn verify_payment_signature(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    let Some(expected) = hex::decode(signature) else {
        return false;
    };
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    pub fn decode(text: &str) -> Option<Vec<u8>> {
        if text.len() % 2 != 0 {
            return None;
        }
        (0..text.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(text.get(i..i + 2)?, 16).ok())
            .collect()
    }
}
