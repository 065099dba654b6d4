//! Local input throttle.
//!
//! Accepts at most one pointer sample per window. Samples that land inside
//! the window are dropped outright, never queued or merged.

use std::time::{Duration, Instant};

/// Default minimum spacing between accepted samples.
pub const DEFAULT_THROTTLE_WINDOW: Duration = Duration::from_millis(20);

/// Fixed-window sample throttle.
#[derive(Debug, Clone)]
pub struct InputThrottle {
    window: Duration,
    last_accepted: Option<Instant>,
}

impl InputThrottle {
    /// Create a throttle with the given window.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
        }
    }

    /// The configured window.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Try to accept a sample taken at `at`.
    ///
    /// Returns `true` and opens a new window if at least `window` has passed
    /// since the last accepted sample. Samples older than the last accepted
    /// one are rejected.
    pub fn try_accept(&mut self, at: Instant) -> bool {
        let accept = match self.last_accepted {
            None => true,
            Some(last) => at
                .checked_duration_since(last)
                .is_some_and(|elapsed| elapsed >= self.window),
        };
        if accept {
            self.last_accepted = Some(at);
        }
        accept
    }

    /// Forget the last accepted sample.
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}

impl Default for InputThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE_WINDOW)
    }
}
