//! Core sampling engine for AccelWatch
//!
//! Turns a LIS2DH-class accelerometer into a stream of numbered report
//! lines, either by polling or by reacting to the sensor's interrupts.
//! Designed to run next to an interrupt handler on small devices.
//!
//! Key constraints:
//! - No heap allocation
//! - Nothing that writes device configuration runs in the fired handler
//! - The sensor driver is a trait; hardware access lives elsewhere
//!
//! ```no_run
//! use accelwatch_core::{AttributeConverter, FullScaleRange, OdrTier};
//!
//! let converter = AttributeConverter::new(FullScaleRange::G2, OdrTier::Hz100);
//!
//! let threshold = converter.encode_threshold(10.0);
//! match converter.encode_duration(0.1) {
//!     Ok(duration) => {}, // write both attributes, then arm the trigger
//!     Err(e) => {},       // duration too long for this ODR
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod arbiter;
pub mod config;
pub mod constants;
pub mod convert;
pub mod driver;
pub mod errors;
pub mod reader;
pub mod time;
pub mod work;

// Public API
pub use arbiter::{ArbiterState, ArbiterStats, FiredReport, TriggerArbiter};
pub use config::{FullScaleRange, OdrTier, PowerMode, SamplerConfig, SamplingMode, TriggerMode};
pub use convert::{encode_duration, encode_threshold, AttributeConverter, EncodedAttribute};
pub use driver::{
    AttributeKind, Channel, ChannelReading, FiredNotifier, SampleSource, SensorDriver,
    SensorValue, TriggerConfig, TriggerKind,
};
pub use errors::{ArbiterError, ConfigError, DriverError, RangeError, ReadError};
pub use reader::{ReportSink, SampleLine, SampleReader, SampleRecord};
pub use time::{TimeSource, Timestamp};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
