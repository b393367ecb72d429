//! Clock
//!
//! Time source seam so expiration arithmetic is testable with a fixed clock.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Time source interface.
pub trait Clock: Send + Sync {
    /// Current time as epoch seconds, integer-rounded.
    fn now(&self) -> i64;
}

/// System wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64;
        // Round to the nearest second rather than truncating
        (millis + 500) / 1000
    }
}

/// Mock clock for testing.
#[derive(Debug, Default)]
pub struct MockClock {
    now: AtomicI64,
}

impl MockClock {
    /// Create a mock clock fixed at the given instant.
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    /// Set the current instant.
    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Advance the clock by the given number of seconds.
    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl<C: Clock> Clock for std::sync::Arc<C> {
    fn now(&self) -> i64 {
        self.as_ref().now()
    }
}
