//! Subscription (one-time plan purchase) model and DTOs.

use ezemailer_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: DbId,
    pub user_id: DbId,
    pub plan: String,
    pub amount: i64,
    pub currency: String,
    pub order_id: Option<String>,
    pub payment_id: String,
    pub status: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateSubscription {
    pub user_id: DbId,
    pub plan: String,
    pub amount: i64,
    pub currency: String,
    pub order_id: Option<String>,
    pub payment_id: String,
    pub status: String,
}
