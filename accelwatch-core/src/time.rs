//! Time management
//!
//! Report lines carry the uptime in milliseconds and the rearm timer is
//! expressed in milliseconds, so a monotonic millisecond clock is all the
//! sampler needs:
//! - `MonotonicTime` counts from construction (std only)
//! - `FixedTime` is stepped by hand, for tests and simulations

/// Milliseconds since boot
pub type Timestamp = u64;

/// Source of monotonic time
pub trait TimeSource {
    /// Current uptime in milliseconds
    fn now(&self) -> Timestamp;

    /// Resolution in milliseconds
    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Uptime clock backed by `std::time::Instant`
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicTime {
    boot: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicTime {
    /// Clock starting at zero now
    pub fn new() -> Self {
        Self { boot: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicTime {
    fn now(&self) -> Timestamp {
        self.boot.elapsed().as_millis() as Timestamp
    }
}

/// Hand-stepped time source
#[derive(Debug, Clone, Default)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Clock stopped at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to `timestamp`
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move forward by `ms`
    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}
