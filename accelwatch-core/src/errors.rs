//! Error Types for Sensor Configuration and Sampling
//!
//! ## Design Philosophy
//!
//! Errors here follow the same rules as everything else that may run next to
//! an interrupt handler:
//!
//! 1. **Small Size**: every variant is a handful of words; the device name is a
//!    `&'static str` handed out by the driver.
//! 2. **No Heap Allocation**: nothing owns a `String`.
//! 3. **Copy Semantics**: errors are returned from the fired handler and stored
//!    in statistics, so they are `Copy`.
//!
//! ## Error Categories
//!
//! ### Configuration
//! - `RangeError`: a duration outside what the ODR can represent. Rejected,
//!   nothing is written to the device.
//!
//! Thresholds never produce an error: they are clamped to the full-scale range
//! and a warning is logged.
//!
//! ### Driver
//! - `DriverError`: any negative return from `sample_fetch`, `channel_get`,
//!   `attr_set` or `trigger_set`, carrying the errno and the device name.
//!
//! ### Read path
//! - `ReadError`: a failed fetch. Reported, the caller keeps sampling.
//!
//! ### Trigger lifecycle
//! - `ArbiterError`: a rearm that could not re-register the trigger. The
//!   arbiter stays in `RearmScheduled` and does not retry.
//!
//! An overrun is *not* an error: the record is still valid and carries an
//! `overrun` flag.

use thiserror_no_std::Error;

/// Negative errno as returned by the sensor driver.
pub type ErrorCode = i32;

/// "Message corrupted": the driver's way of reporting a sample overrun.
pub const EBADMSG: ErrorCode = 77;

/// Operation not supported.
pub const ENOTSUP: ErrorCode = 134;

/// I/O error.
pub const EIO: ErrorCode = 5;

/// Device busy.
pub const EBUSY: ErrorCode = 16;

/// Result of a raw driver call.
pub type DriverResult<T> = Result<T, ErrorCode>;

/// Duration could not be represented at the configured output data rate
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("Duration {value}s outside representable range [0, {max_seconds}]s")]
pub struct RangeError {
    /// Requested duration in seconds
    pub value: f64,
    /// Longest duration the ODR tier can encode
    pub max_seconds: f64,
}

/// A driver call failed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Device {device} returned error {code}")]
pub struct DriverError {
    /// Negative errno from the driver
    pub code: ErrorCode,
    /// Name of the device that rejected the call
    pub device: &'static str,
}

impl DriverError {
    /// Error `code` reported by `device`
    pub const fn new(code: ErrorCode, device: &'static str) -> Self {
        Self { code, device }
    }
}

/// Sample read failed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    /// `sample_fetch` returned an error other than an overrun
    #[error("Sample fetch failed: {0}")]
    Fetch(DriverError),

    /// Acceleration channel could not be read after a successful fetch
    #[error("Acceleration read failed: {0}")]
    Channel(DriverError),
}

impl ReadError {
    /// Errno carried by the underlying driver error
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Fetch(e) | Self::Channel(e) => e.code,
        }
    }
}

/// Failures of the trigger lifecycle
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArbiterError {
    /// Re-registering the trigger failed; the arbiter is stuck
    #[error("Failed to reset trigger: {0}")]
    RearmFailed(DriverError),

    /// `rearm` was called with no rearm outstanding
    #[error("No rearm scheduled")]
    NotScheduled,
}

/// Errors raised while configuring the device at startup
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Duration rejected before any device write
    #[error("{0}")]
    Range(RangeError),

    /// The device refused the attribute write
    #[error("Attribute write failed: {0}")]
    Driver(DriverError),

    /// Sampling frequency does not fit the attribute's integer part
    #[error("Sampling frequency {0} Hz cannot be encoded")]
    SamplingFrequency(u32),
}

impl From<RangeError> for ConfigError {
    fn from(e: RangeError) -> Self {
        Self::Range(e)
    }
}

impl From<DriverError> for ConfigError {
    fn from(e: DriverError) -> Self {
        Self::Driver(e)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DriverError {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Device {} error {}", self.device, self.code)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ReadError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Fetch(e) => defmt::write!(fmt, "Fetch failed: {}", e),
            Self::Channel(e) => defmt::write!(fmt, "Channel read failed: {}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ArbiterError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::RearmFailed(e) => defmt::write!(fmt, "Rearm failed: {}", e),
            Self::NotScheduled => defmt::write!(fmt, "No rearm scheduled"),
        }
    }
}
