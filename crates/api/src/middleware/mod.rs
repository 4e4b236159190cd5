//! Request extractors and guards.
//!
//! - [`auth::AuthUser`] -- the authenticated user from a JWT Bearer token.
//! - [`entitlement::RequireEntitlement`] -- requires an active subscription.
//! - [`rate_limit::IngestRateLimiter`] -- per-user fixed-window ingest limit.

pub mod auth;
pub mod entitlement;
pub mod rate_limit;
