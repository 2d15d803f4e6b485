//! Session timing
//!
//! Monotonic millisecond clock for tick timestamps and the capture delay.

use std::time::Duration;
use tokio::time::Instant;

/// Milliseconds since a session started.
///
/// Built on `tokio::time::Instant`, so it follows paused time in tests.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    start: Instant,
}

impl SessionClock {
    /// Create a clock with the current instant as time zero
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Create a clock from an existing start instant
    pub fn from_instant(start: Instant) -> Self {
        Self { start }
    }

    /// Milliseconds elapsed since the clock started
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// The instant `ms` milliseconds after the start
    #[inline]
    pub fn instant_at(&self, ms: u64) -> Instant {
        self.start + Duration::from_millis(ms)
    }

    pub fn start_instant(&self) -> Instant {
        self.start
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}
