//! Repository for the `subscriptions` table.

use ezemailer_core::types::DbId;
use sqlx::PgPool;

use crate::models::subscription::{CreateSubscription, Subscription};

const COLUMNS: &str =
    "id, user_id, plan, amount, currency, order_id, payment_id, status, created_at";

pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Record a captured purchase.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSubscription,
    ) -> Result<Subscription, sqlx::Error> {
        let query = format!(
            "INSERT INTO subscriptions (user_id, plan, amount, currency, order_id, payment_id, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(input.user_id)
            .bind(&input.plan)
            .bind(input.amount)
            .bind(&input.currency)
            .bind(&input.order_id)
            .bind(&input.payment_id)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    /// Whether the user holds at least one captured subscription.
    pub async fn has_active_for_user(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM subscriptions WHERE user_id = $1 AND status = 'captured'
             )",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
