//! Physical units to device attribute encodings
//!
//! The motion interrupt is configured with two attributes:
//!
//! - **Slope threshold** in m/s². The part can only compare against values
//!   inside its full-scale range, so anything outside `[0, range max]` is
//!   clamped with a warning. Saturating is harmless: the interrupt simply
//!   fires at full-scale.
//! - **Slope duration** in seconds, stored as a 7-bit count of ODR periods.
//!   A duration the register cannot hold is rejected with [`RangeError`]
//!   and nothing is written; a silently shortened window would change when
//!   the interrupt fires.
//!
//! ```
//! use accelwatch_core::convert::{encode_duration, encode_threshold};
//!
//! let th = encode_threshold(25.0, 19.6133);
//! assert_eq!((th.integer, th.micro), (19, 613300));
//!
//! let dur = encode_duration(0.1, 100, 1.27).unwrap();
//! assert_eq!(dur.integer, 10);
//! ```

use crate::config::{FullScaleRange, OdrTier};
use crate::constants::sensors::{ACTIVITY_MAX_COUNT, MICRO_SCALE};
use crate::driver::{AttributeKind, Channel, SensorDriver, SensorValue};
use crate::errors::{ConfigError, DriverError, RangeError};

/// Device-native attribute value
pub type EncodedAttribute = SensorValue;

/// Encode a slope threshold, clamping to `[0, range_max]`
pub fn encode_threshold(value: f64, range_max: f64) -> EncodedAttribute {
    let mut threshold = value;
    if threshold > range_max {
        log_warn!(
            "Threshold {} exceeds maximum {}, capping it",
            threshold,
            range_max
        );
        threshold = range_max;
    }
    // NaN fails both comparisons above; treat it like a negative input
    if !(threshold >= 0.0) {
        log_warn!("Threshold {} cannot be less than 0, limiting it to 0", threshold);
        threshold = 0.0;
    }

    let scaled = (threshold * MICRO_SCALE as f64) as u64;
    SensorValue::new(
        (scaled / MICRO_SCALE) as i32,
        (scaled % MICRO_SCALE) as i32,
    )
}

/// Encode a slope duration as a count of ODR periods
///
/// Rounds half up and clamps to the 7-bit register range.
pub fn encode_duration(
    value: f64,
    odr_hz: u32,
    max_seconds: f64,
) -> Result<EncodedAttribute, RangeError> {
    if !(value >= 0.0 && value <= max_seconds) {
        log_warn!("Invalid timeout value {}", value);
        return Err(RangeError { value, max_seconds });
    }

    let periods = libm::floor(value * odr_hz as f64 + 0.5) as i64;
    let count = periods.clamp(0, ACTIVITY_MAX_COUNT as i64) as i32;
    log_debug!("Decimal value for act duration {}", count);
    Ok(SensorValue::from_integer(count))
}

/// Converter bound to a configured range and ODR tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeConverter {
    range: FullScaleRange,
    odr: OdrTier,
}

impl AttributeConverter {
    /// Converter for one range and ODR setting
    pub const fn new(range: FullScaleRange, odr: OdrTier) -> Self {
        Self { range, odr }
    }

    /// Configured full-scale range
    pub fn range(&self) -> FullScaleRange {
        self.range
    }

    /// Configured ODR tier
    pub fn odr(&self) -> OdrTier {
        self.odr
    }

    /// Encode a threshold against the configured full-scale range
    pub fn encode_threshold(&self, value: f64) -> EncodedAttribute {
        encode_threshold(value, self.range.max_m_s2())
    }

    /// Encode a duration against the configured ODR tier
    pub fn encode_duration(&self, value: f64) -> Result<EncodedAttribute, RangeError> {
        encode_duration(value, self.odr.hz(), self.odr.activity_max_seconds())
    }

    /// Encode and write the slope threshold
    pub fn write_threshold<D: SensorDriver>(
        &self,
        driver: &mut D,
        value: f64,
    ) -> Result<EncodedAttribute, DriverError> {
        let encoded = self.encode_threshold(value);
        write_attribute(driver, AttributeKind::SlopeThreshold, &encoded)?;
        Ok(encoded)
    }

    /// Encode and write the slope duration
    ///
    /// A duration outside the tier's range never reaches the device.
    pub fn write_duration<D: SensorDriver>(
        &self,
        driver: &mut D,
        value: f64,
    ) -> Result<EncodedAttribute, ConfigError> {
        let encoded = self.encode_duration(value)?;
        write_attribute(driver, AttributeKind::SlopeDuration, &encoded)?;
        Ok(encoded)
    }
}

/// Write one acceleration-channel attribute, logging the device on failure
pub fn write_attribute<D: SensorDriver>(
    driver: &mut D,
    attribute: AttributeKind,
    value: &SensorValue,
) -> Result<(), DriverError> {
    driver
        .attr_set(Channel::AccelXyz, attribute, value)
        .map_err(|code| {
            let err = DriverError::new(code, driver.name());
            log_error!("Failed to set {:?}. Device: {}, error: {}", attribute, err.device, code);
            err
        })
}
