//! Constants for AccelWatch Core
//!
//! Every numeric value used by the converter, the arbiter and the sampler
//! lives here, with its unit in the name.
//!
//! ## Organization
//!
//! - **Sensors**: full-scale ranges, ODR tiers, register widths
//! - **Time**: loop cadences and unit conversions

/// Accelerometer specifications: ranges, ODR tiers, register limits.
pub mod sensors;

/// Loop cadences and time unit conversions.
pub mod time;

pub use sensors::{
    ACCEL_RANGE_MAX_2G_M_S2, ACCEL_RANGE_MAX_4G_M_S2,
    ACCEL_RANGE_MAX_8G_M_S2, ACCEL_RANGE_MAX_16G_M_S2,
    ACTIVITY_MAX_COUNT, MICRO_SCALE,
};

pub use time::{MS_PER_SECOND, POLL_INTERVAL_MS, IDLE_INTERVAL_MS};
