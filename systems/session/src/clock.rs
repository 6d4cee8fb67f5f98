//! Injected clock service.
//!
//! Time-dependent components take a [`Clock`] instead of reading module
//! or system globals, so tests pin time and multiple server instances
//! keep independent offsets.

use std::time::{SystemTime, UNIX_EPOCH};

/// A source of wall-clock milliseconds.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// The real system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock pinned to a fixed instant, for tests.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.0
    }
}

/// Client/server time synchronization over an injected clock.
#[derive(Clone, Copy, Debug)]
pub struct ClockSync<C> {
    clock: C,
    offset_millis: i64,
}

impl<C: Clock> ClockSync<C> {
    /// Wraps a clock with a zero offset.
    #[must_use]
    pub const fn new(clock: C) -> Self {
        Self {
            clock,
            offset_millis: 0,
        }
    }

    /// Records the offset between the server's reported time and the
    /// local clock.
    pub fn set_server_time(&mut self, server_millis: u64) {
        self.offset_millis = server_millis as i64 - self.clock.now_millis() as i64;
    }

    /// Current time corrected by the recorded server offset.
    #[must_use]
    pub fn now_millis(&self) -> u64 {
        self.clock
            .now_millis()
            .saturating_add_signed(self.offset_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ClockSync, FixedClock};

    #[test]
    fn fixed_clocks_pin_time() {
        let clock = FixedClock(1_000);
        assert_eq!(clock.now_millis(), 1_000);
    }

    #[test]
    fn synchronization_applies_the_server_offset() {
        let mut sync = ClockSync::new(FixedClock(10_000));
        assert_eq!(sync.now_millis(), 10_000);

        sync.set_server_time(12_500);
        assert_eq!(sync.now_millis(), 12_500);

        sync.set_server_time(8_000);
        assert_eq!(sync.now_millis(), 8_000);
    }
}
