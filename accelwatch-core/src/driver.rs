//! Sensor driver contract
//!
//! The accelerometer driver is an external collaborator. These traits are the
//! whole of what the sampler needs from it: fetch a sample, read channels,
//! write attributes, register or clear a trigger.
//!
//! All calls are synchronous and return the driver's negative errno on
//! failure. A fetch may return `-EBADMSG` to report an overrun.
//!
//! ## Execution contexts
//!
//! The driver delivers trigger notifications from a restricted context
//! (interrupt or driver thread). From there only [`SampleSource`] calls and
//! clearing the trigger are allowed; attribute writes and trigger
//! registration belong to ordinary code.

use crate::errors::DriverResult;

/// Fixed-point device value: integer part plus millionths
///
/// This is also the device-native encoding produced by the attribute
/// converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorValue {
    /// Integer part
    pub integer: i32,
    /// Fractional part in micro-units, same sign as `integer`
    pub micro: i32,
}

impl SensorValue {
    /// Value from its integer and millionths parts
    pub const fn new(integer: i32, micro: i32) -> Self {
        Self { integer, micro }
    }

    /// Whole-number value with no fractional part
    pub const fn from_integer(integer: i32) -> Self {
        Self { integer, micro: 0 }
    }

    /// Decode to a physical quantity
    pub fn to_f64(self) -> f64 {
        self.integer as f64 + self.micro as f64 / 1_000_000.0
    }

    /// Encode a physical quantity, truncating below one micro-unit
    pub fn from_f64(value: f64) -> Self {
        let scaled = (value * 1_000_000.0) as i64;
        Self {
            integer: (scaled / 1_000_000) as i32,
            micro: (scaled % 1_000_000) as i32,
        }
    }
}

/// Data channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// All three acceleration axes
    AccelXyz,
    /// Die temperature
    DieTemp,
}

/// Writable device attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Motion interrupt threshold (m/s²)
    SlopeThreshold,
    /// Motion interrupt duration (ODR periods)
    SlopeDuration,
    /// Output data rate (Hz)
    SamplingFrequency,
}

/// Hardware trigger kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// New sample available; re-arms itself in hardware
    DataReady,
    /// Acceleration change above threshold for the configured duration (6D)
    Delta,
}

/// Trigger registration key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerConfig {
    /// Channel the trigger watches
    pub channel: Channel,
    /// Condition that fires it
    pub kind: TriggerKind,
}

impl TriggerConfig {
    /// New-sample trigger on the acceleration channel
    pub const fn data_ready() -> Self {
        Self { channel: Channel::AccelXyz, kind: TriggerKind::DataReady }
    }

    /// Motion trigger on the acceleration channel
    pub const fn delta() -> Self {
        Self { channel: Channel::AccelXyz, kind: TriggerKind::Delta }
    }
}

/// Values returned by a channel read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelReading {
    /// One value per acceleration axis (m/s²)
    Xyz([SensorValue; 3]),
    /// A single value
    Scalar(SensorValue),
}

/// Receives "trigger fired" notifications from the driver
///
/// Registered with [`SensorDriver::trigger_set`]. Implementations must be
/// cheap and non-blocking: they run in the driver's restricted context and
/// should only hand the event over to ordinary code.
pub trait FiredNotifier {
    /// Report that `trigger` fired. Returns `false` if the event was dropped.
    fn notify(&self, trigger: TriggerConfig) -> bool;
}

/// Read-only sampling calls, allowed in every context
pub trait SampleSource {
    /// Device name for diagnostics
    fn name(&self) -> &'static str;

    /// Latch a new sample. `Err(-EBADMSG)` signals an overrun.
    fn sample_fetch(&mut self) -> DriverResult<()>;

    /// Read a channel of the latched sample
    fn channel_get(&mut self, channel: Channel) -> DriverResult<ChannelReading>;
}

/// Full driver contract
pub trait SensorDriver: SampleSource {
    /// Handle installed with a trigger registration
    type Notifier: FiredNotifier;

    /// Device initialised and responding
    fn is_ready(&self) -> bool {
        true
    }

    /// Write a device attribute
    fn attr_set(
        &mut self,
        channel: Channel,
        attribute: AttributeKind,
        value: &SensorValue,
    ) -> DriverResult<()>;

    /// Register `handler` for `trigger`, or clear the registration with `None`
    fn trigger_set(
        &mut self,
        trigger: &TriggerConfig,
        handler: Option<Self::Notifier>,
    ) -> DriverResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_value_round_trip() {
        let v = SensorValue::from_f64(9.80665);
        assert_eq!(v, SensorValue::new(9, 806650));
        assert!((v.to_f64() - 9.80665).abs() < 1e-6);
    }

    #[test]
    fn negative_values_keep_sign_in_both_parts() {
        let v = SensorValue::from_f64(-1.5);
        assert_eq!(v, SensorValue::new(-1, -500000));
        assert_eq!(v.to_f64(), -1.5);
    }
}
