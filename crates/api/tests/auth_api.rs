//! HTTP-level integration tests for signup, login, token refresh, logout
//! and password reset.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{body_json, post_json, post_json_auth, TEST_PASSWORD};
use ezemailer_api::auth::jwt::hash_token;
use ezemailer_db::repositories::UserRepo;
use sqlx::PgPool;

async fn login(app: axum::Router, email: &str, password: &str) -> axum::response::Response {
    let body = serde_json::json!({ "email": email, "password": password });
    post_json(app, "/api/v1/auth/login", body).await
}

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_returns_tokens(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "name": "Ada Lovelace",
        "email": "Ada@Example.com",
        "password": "analytical",
    });
    let response = post_json(app, "/api/v1/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["email"], "ada@example.com");
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_duplicate_email_conflicts(pool: PgPool) {
    common::create_user(&pool, "taken@example.com").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "name": "Someone Else",
        "email": "taken@example.com",
        "password": "whatever1",
    });
    let response = post_json(app, "/api/v1/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_rejects_short_password_and_bad_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "name": "Valid Name",
        "email": "not-an-email",
        "password": "abc",
    });
    let response = post_json(app, "/api/v1/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success_is_case_insensitive_on_email(pool: PgPool) {
    let user = common::create_user(&pool, "login@example.com").await;
    let app = common::build_test_app(pool);

    let response = login(app, "LOGIN@example.com", TEST_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["id"], user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    common::create_user(&pool, "wrongpw@example.com").await;
    let app = common::build_test_app(pool);

    let response = login(app, "wrongpw@example.com", "incorrect").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_nonexistent_user(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = login(app, "ghost@example.com", "whatever").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Refresh / logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_rotates_token(pool: PgPool) {
    common::create_user(&pool, "refresher@example.com").await;

    let app = common::build_test_app(pool.clone());
    let login_json = body_json(login(app, "refresher@example.com", TEST_PASSWORD).await).await;
    let refresh_token = login_json["refresh_token"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app, "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_ne!(json["refresh_token"].as_str().unwrap(), refresh_token);

    // The rotated-out token no longer works.
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_with_invalid_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "refresh_token": "not-a-real-token" });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_revokes_sessions(pool: PgPool) {
    common::create_user(&pool, "logout@example.com").await;

    let app = common::build_test_app(pool.clone());
    let login_json = body_json(login(app, "logout@example.com", TEST_PASSWORD).await).await;
    let access = login_json["access_token"].as_str().unwrap();
    let refresh = login_json["refresh_token"].as_str().unwrap();

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/auth/logout", access, serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "refresh_token": refresh });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/auth/logout", serde_json::json!({})).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_forgot_password_accepts_unknown_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "nobody@example.com" });
    let response = post_json(app, "/api/v1/auth/forgot", body).await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_forgot_password_stores_token_for_known_email(pool: PgPool) {
    let user = common::create_user(&pool, "forgetful@example.com").await;
    let app = common::build_test_app(pool.clone());

    let body = serde_json::json!({ "email": "forgetful@example.com" });
    let response = post_json(app, "/api/v1/auth/forgot", body).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.reset_token_hash.is_some());
    assert!(stored.reset_token_expires_at.unwrap() > Utc::now());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_password_with_token(pool: PgPool) {
    let user = common::create_user(&pool, "resetme@example.com").await;
    UserRepo::set_reset_token(
        &pool,
        user.id,
        &hash_token("reset-plaintext"),
        Utc::now() + chrono::Duration::hours(1),
    )
    .await
    .unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "token": "reset-plaintext", "password": "brand-new-pass" });
    let response = post_json(app, "/api/v1/auth/reset", body.clone()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = login(app, "resetme@example.com", "brand-new-pass").await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let response = login(app, "resetme@example.com", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Tokens are single use.
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/auth/reset", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_password_rejects_expired_token(pool: PgPool) {
    let user = common::create_user(&pool, "late@example.com").await;
    UserRepo::set_reset_token(
        &pool,
        user.id,
        &hash_token("stale"),
        Utc::now() - chrono::Duration::minutes(1),
    )
    .await
    .unwrap();

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "token": "stale", "password": "brand-new-pass" });
    let response = post_json(app, "/api/v1/auth/reset", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
