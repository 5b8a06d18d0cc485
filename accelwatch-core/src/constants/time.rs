//! Time-Related Constants
//!
//! Loop cadences and conversion factors used by the sampler.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

// ===== LOOP CADENCES =====

/// Polling interval when interrupts are disabled (milliseconds).
///
/// 0.5 Hz: one sample every two seconds.
pub const POLL_INTERVAL_MS: u64 = 2000;

/// Idle sleep of the main loop while waiting for triggers (milliseconds).
///
/// The loop does no work on this tick; it only bounds how long the
/// orchestrator goes without checking for shutdown.
pub const IDLE_INTERVAL_MS: u64 = 2000;
