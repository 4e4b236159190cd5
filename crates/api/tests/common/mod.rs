#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use ezemailer_api::auth::jwt::{generate_access_token, JwtConfig};
use ezemailer_api::auth::password::hash_password;
use ezemailer_api::config::{PaymentConfig, ServerConfig};
use ezemailer_api::middleware::rate_limit::IngestRateLimiter;
use ezemailer_api::router::build_app_router;
use ezemailer_api::state::AppState;
use ezemailer_core::payment::{PaymentCapture, PaymentError, PaymentOrder, PaymentProvider};
use ezemailer_db::models::subscription::CreateSubscription;
use ezemailer_db::models::user::{CreateUser, User};
use ezemailer_db::repositories::{SubscriptionRepo, UserRepo};
use ezemailer_db::store::PgTemplateStore;

pub const TEST_PASSWORD: &str = "hunter22";
pub const TEST_PAYMENT_SECRET: &str = "test_key_secret";
/// Ingests allowed per user per window in tests.
pub const TEST_INGEST_LIMIT: u32 = 5;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-jwt-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        max_upload_bytes: 64 * 1024,
        ingest_rate_limit: TEST_INGEST_LIMIT,
        ingest_rate_window_secs: 60,
        password_reset_expiry_mins: 60,
        payment: PaymentConfig {
            key_id: "test_key_id".to_string(),
            key_secret: TEST_PAYMENT_SECRET.to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
            currency: "INR".to_string(),
        },
    }
}

/// In-process payment provider.
///
/// Payment ids starting with `fail_` are rejected by the "provider" and ids
/// starting with `pending_` come back authorized but not captured.
pub struct FakePayments;

#[async_trait]
impl PaymentProvider for FakePayments {
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentOrder, PaymentError> {
        Ok(PaymentOrder {
            id: format!("order_{amount_minor}"),
            amount: amount_minor,
            currency: currency.to_string(),
            receipt: Some(receipt.to_string()),
            status: "created".to_string(),
        })
    }

    async fn capture(
        &self,
        payment_id: &str,
        _amount_minor: i64,
        _currency: &str,
    ) -> Result<PaymentCapture, PaymentError> {
        if payment_id.starts_with("fail_") {
            return Err(PaymentError::Rejected {
                status: 400,
                message: "The payment has already been captured".to_string(),
            });
        }
        let status = if payment_id.starts_with("pending_") {
            "authorized"
        } else {
            "captured"
        };
        Ok(PaymentCapture {
            id: payment_id.to_string(),
            status: status.to_string(),
        })
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and the fake payment provider.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        templates: Arc::new(PgTemplateStore::new(pool.clone())),
        payments: Arc::new(FakePayments),
        ingest_limiter: Arc::new(IngestRateLimiter::new(
            config.ingest_rate_limit,
            Duration::from_secs(config.ingest_rate_window_secs),
        )),
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, email: &str) -> User {
    let input = CreateUser {
        name: "Test Person".to_string(),
        email: email.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Mint an access token for `user` signed with the test secret.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &test_config().jwt).expect("token generation should succeed")
}

/// Record a captured subscription so `user` holds an active plan.
pub async fn grant_plan(pool: &PgPool, user: &User) {
    SubscriptionRepo::create(
        pool,
        &CreateSubscription {
            user_id: user.id,
            plan: "basic".to_string(),
            amount: 2,
            currency: "INR".to_string(),
            order_id: None,
            payment_id: format!("pay_fixture_{}", user.id),
            status: "captured".to_string(),
        },
    )
    .await
    .expect("subscription creation should succeed");
}

/// A user with an active plan and a token for them.
pub async fn entitled_user(pool: &PgPool, email: &str) -> (User, String) {
    let user = create_user(pool, email).await;
    grant_plan(pool, &user).await;
    let token = token_for(&user);
    (user, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

/// One part of a multipart body: `(field name, file name, content)`.
pub type Part<'a> = (&'a str, Option<&'a str>, &'a str);

const BOUNDARY: &str = "ezemailer-test-boundary";

fn multipart_body(parts: &[Part<'_>]) -> String {
    let mut body = String::new();
    for (name, file_name, content) in parts {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        match file_name {
            Some(file_name) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: text/html\r\n\r\n"
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
            )),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

pub async fn post_multipart(app: Router, uri: &str, parts: &[Part<'_>]) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}

pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    token: &str,
    parts: &[Part<'_>],
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}
