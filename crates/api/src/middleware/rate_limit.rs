//! Fixed-window rate limiting for ingest endpoints.
//!
//! Each user gets `limit` ingests per window. The counter resets when the
//! window elapses. The limiter is independent of the transform engine and
//! holds no state beyond the current windows.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use ezemailer_core::types::DbId;

use crate::error::AppError;

/// Windows kept before stale entries are pruned.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
pub struct IngestRateLimiter {
    /// Requests allowed per window. `0` disables limiting.
    limit: u32,
    window: Duration,
    windows: Mutex<HashMap<DbId, Window>>,
}

impl IngestRateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Count one ingest for `user_id`, rejecting it once the window is full.
    pub fn check(&self, user_id: DbId) -> Result<(), AppError> {
        self.check_at(user_id, Instant::now())
    }

    fn check_at(&self, user_id: DbId, now: Instant) -> Result<(), AppError> {
        if self.limit == 0 {
            return Ok(());
        }

        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        if windows.len() > PRUNE_THRESHOLD {
            let window = self.window;
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = windows.entry(user_id).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.limit {
            let elapsed = now.duration_since(entry.started);
            let retry_after = self.window.saturating_sub(elapsed);
            tracing::warn!(user_id, limit = self.limit, "Ingest rate limit exceeded");
            return Err(AppError::RateLimited {
                retry_after_secs: retry_after.as_secs().max(1),
            });
        }

        entry.count += 1;
        Ok(())
    }
}
