//! Per-tenant fixed-window request accounting.
//!
//! Opt-in: the tenant pipeline itself only annotates rate-limit headers. When
//! enforcement is switched on, the HTTP layer consults this limiter with the
//! tenant's configured `maxRequests` / `windowMs`.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use campus_core::TenantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitOutcome {
    Allowed { remaining: u64 },
    Limited { retry_after: Duration },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u64,
}

/// Counts requests per tenant in fixed windows.
#[derive(Debug, Default)]
pub struct FixedWindowLimiter {
    windows: Mutex<HashMap<TenantId, Window>>,
}

impl FixedWindowLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one request for `tenant_id` at `now`.
    ///
    /// A zero-length window disables counting. A poisoned lock admits the
    /// request rather than failing it.
    pub fn check(
        &self,
        tenant_id: &TenantId,
        max_requests: u64,
        window: Duration,
        now: Instant,
    ) -> RateLimitOutcome {
        if window.is_zero() {
            return RateLimitOutcome::Allowed {
                remaining: max_requests,
            };
        }

        let Ok(mut windows) = self.windows.lock() else {
            tracing::warn!("rate limiter lock poisoned; admitting request");
            return RateLimitOutcome::Allowed { remaining: 0 };
        };

        let entry = windows.entry(tenant_id.clone()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        let elapsed = now.saturating_duration_since(entry.started_at);
        if elapsed >= window {
            entry.started_at = now;
            entry.count = 0;
        }

        if entry.count < max_requests {
            entry.count += 1;
            RateLimitOutcome::Allowed {
                remaining: max_requests - entry.count,
            }
        } else {
            RateLimitOutcome::Limited {
                retry_after: window.saturating_sub(now.saturating_duration_since(entry.started_at)),
            }
        }
    }
}
