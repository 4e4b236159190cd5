use ezemailer_core::ingest::DEFAULT_MAX_UPLOAD_BYTES;
use ezemailer_core::payment::DEFAULT_CURRENCY;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// Largest accepted upload in bytes (default: 5 MiB).
    pub max_upload_bytes: usize,
    /// Ingest requests allowed per user per window (default: `30`).
    pub ingest_rate_limit: u32,
    /// Length of the ingest rate window in seconds (default: `60`).
    pub ingest_rate_window_secs: u64,
    /// Lifetime of password reset tokens in minutes (default: `60`).
    pub password_reset_expiry_mins: i64,
    pub payment: PaymentConfig,
}

/// Credentials and endpoint of the payment gateway.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub key_id: String,
    pub key_secret: String,
    pub api_base: String,
    pub currency: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

impl PaymentConfig {
    /// | Env Var               | Default                          |
    /// |-----------------------|----------------------------------|
    /// | `RAZORPAY_KEY_ID`     | empty                            |
    /// | `RAZORPAY_KEY_SECRET` | empty                            |
    /// | `RAZORPAY_API_BASE`   | `https://api.razorpay.com/v1`    |
    /// | `PAYMENT_CURRENCY`    | `INR`                            |
    pub fn from_env() -> Self {
        Self {
            key_id: env_or("RAZORPAY_KEY_ID", ""),
            key_secret: env_or("RAZORPAY_KEY_SECRET", ""),
            api_base: env_or("RAZORPAY_API_BASE", "https://api.razorpay.com/v1"),
            currency: env_or("PAYMENT_CURRENCY", DEFAULT_CURRENCY),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                    |
    /// |------------------------------|----------------------------|
    /// | `HOST`                       | `0.0.0.0`                  |
    /// | `PORT`                       | `3000`                     |
    /// | `CORS_ORIGINS`               | `http://localhost:3001`    |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`      | `30`                       |
    /// | `MAX_UPLOAD_BYTES`           | `5242880`                  |
    /// | `INGEST_RATE_LIMIT`          | `30`                       |
    /// | `INGEST_RATE_WINDOW_SECS`    | `60`                       |
    /// | `PASSWORD_RESET_EXPIRY_MINS` | `60`                       |
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:3001")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = env_or("SHUTDOWN_TIMEOUT_SECS", "30")
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = env_or("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let ingest_rate_limit: u32 = env_or("INGEST_RATE_LIMIT", "30")
            .parse()
            .expect("INGEST_RATE_LIMIT must be a valid u32");

        let ingest_rate_window_secs: u64 = env_or("INGEST_RATE_WINDOW_SECS", "60")
            .parse()
            .expect("INGEST_RATE_WINDOW_SECS must be a valid u64");

        let password_reset_expiry_mins: i64 = env_or("PASSWORD_RESET_EXPIRY_MINS", "60")
            .parse()
            .expect("PASSWORD_RESET_EXPIRY_MINS must be a valid i64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            max_upload_bytes,
            ingest_rate_limit,
            ingest_rate_window_secs,
            password_reset_expiry_mins,
            payment: PaymentConfig::from_env(),
        }
    }
}
