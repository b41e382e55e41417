//! Advisory in-process rate limiting.
//!
//! Agencies publish per-minute request budgets in their API terms; this
//! token bucket keeps a single process inside that budget. It is not a
//! distributed limiter: multiple processes sharing one API key can still
//! exceed the agency-side limit.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Token bucket sized from a requests-per-minute budget.
///
/// The bucket starts full and refills continuously at `capacity` tokens
/// per minute. `try_acquire` removes one token or reports exhaustion.
pub struct RateLimiter {
    capacity: f64,
    state: Mutex<BucketState>,
}

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Create a limiter allowing `requests_per_minute` calls per minute.
    pub fn per_minute(requests_per_minute: u32) -> Self {
        let capacity = f64::from(requests_per_minute.max(1));
        Self {
            capacity,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Take one token. Returns `false` when the budget is exhausted.
    pub fn try_acquire(&self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    fn try_acquire_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        let elapsed = now.saturating_duration_since(state.last_refill);
        let refill = elapsed.as_secs_f64() / 60.0 * self.capacity;
        state.tokens = (state.tokens + refill).min(self.capacity);
        state.last_refill = now;

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}
