//! Sampler configuration
//!
//! The device is configured from a handful of enumerated choices: full-scale
//! range, output data rate tier, trigger mode and whether to report the die
//! temperature. [`SamplerConfig`] collects them and resolves, once, into the
//! [`SamplingMode`] the orchestrator runs.

use crate::constants::sensors::*;
use crate::constants::time::{IDLE_INTERVAL_MS, MS_PER_SECOND, POLL_INTERVAL_MS};

/// Accelerometer full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FullScaleRange {
    /// ±2g
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "2g"))]
    G2,
    /// ±4g
    #[cfg_attr(feature = "serde", serde(rename = "4g"))]
    G4,
    /// ±8g
    #[cfg_attr(feature = "serde", serde(rename = "8g"))]
    G8,
    /// ±16g
    #[cfg_attr(feature = "serde", serde(rename = "16g"))]
    G16,
}

impl FullScaleRange {
    /// Largest acceleration the range can report (m/s²)
    pub const fn max_m_s2(self) -> f64 {
        match self {
            Self::G2 => ACCEL_RANGE_MAX_2G_M_S2,
            Self::G4 => ACCEL_RANGE_MAX_4G_M_S2,
            Self::G8 => ACCEL_RANGE_MAX_8G_M_S2,
            Self::G16 => ACCEL_RANGE_MAX_16G_M_S2,
        }
    }
}

/// Power mode; only changes the rate of the top ODR tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PowerMode {
    /// 8-bit samples
    LowPower,
    /// 10-bit samples
    #[default]
    Normal,
}

/// Output data rate tier
///
/// Each tier pairs a rate with the longest motion duration the 7-bit
/// duration register can hold at that rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OdrTier {
    /// 1 Hz
    Hz1,
    /// 10 Hz
    Hz10,
    /// 25 Hz
    Hz25,
    /// 50 Hz
    Hz50,
    /// 100 Hz
    #[default]
    Hz100,
    /// 200 Hz
    Hz200,
    /// 400 Hz
    Hz400,
    /// 1.6 kHz
    Hz1600,
    /// Highest rate; 1.25 kHz in low-power mode, 5 kHz in normal mode
    Max(PowerMode),
}

impl OdrTier {
    /// All nine tiers, normal power mode for the top one
    pub const ALL: [OdrTier; 9] = [
        Self::Hz1,
        Self::Hz10,
        Self::Hz25,
        Self::Hz50,
        Self::Hz100,
        Self::Hz200,
        Self::Hz400,
        Self::Hz1600,
        Self::Max(PowerMode::Normal),
    ];

    const fn entry(self) -> (u32, f64) {
        match self {
            Self::Hz1 => ODR_TIER_1,
            Self::Hz10 => ODR_TIER_2,
            Self::Hz25 => ODR_TIER_3,
            Self::Hz50 => ODR_TIER_4,
            Self::Hz100 => ODR_TIER_5,
            Self::Hz200 => ODR_TIER_6,
            Self::Hz400 => ODR_TIER_7,
            Self::Hz1600 => ODR_TIER_8,
            Self::Max(PowerMode::LowPower) => ODR_TIER_9_LOW_POWER,
            Self::Max(PowerMode::Normal) => ODR_TIER_9_NORMAL,
        }
    }

    /// Output data rate (Hz)
    pub const fn hz(self) -> u32 {
        self.entry().0
    }

    /// Longest encodable motion duration (s)
    pub const fn activity_max_seconds(self) -> f64 {
        self.entry().1
    }

    /// One ODR period in whole milliseconds
    ///
    /// Integer division: rates above 1 kHz give 0, meaning "next check".
    pub const fn period_ms(self) -> u64 {
        MS_PER_SECOND / self.hz() as u64
    }
}

/// How the device signals new data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TriggerMode {
    /// No interrupts: poll on a fixed period
    Disabled,
    /// Data-ready interrupt at a sampling frequency set at runtime
    RuntimeOdr,
    /// Motion (delta) interrupt with a fixed threshold and duration
    #[default]
    FixedDuration,
}

/// Complete sampler configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SamplerConfig {
    /// Full-scale range the threshold is clamped to
    pub range: FullScaleRange,
    /// Output data rate; sets the duration scale and the rearm period
    pub odr: OdrTier,
    /// Polling or one of the interrupt modes
    pub trigger_mode: TriggerMode,
    /// Read and report the die temperature with every sample
    pub measure_temperature: bool,
    /// Motion threshold for fixed-duration mode (m/s²)
    pub slope_threshold_m_s2: f64,
    /// Motion duration for fixed-duration mode (s)
    pub slope_duration_s: f64,
    /// Sampling frequency for runtime-ODR mode (Hz)
    pub runtime_odr_hz: u32,
    /// Period of the polling loop (ms)
    pub poll_interval_ms: u64,
    /// Wake-up period while waiting for triggers (ms)
    pub idle_interval_ms: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            range: FullScaleRange::default(),
            odr: OdrTier::default(),
            trigger_mode: TriggerMode::default(),
            measure_temperature: false,
            slope_threshold_m_s2: DEFAULT_SLOPE_THRESHOLD_M_S2,
            slope_duration_s: DEFAULT_SLOPE_DURATION_S,
            runtime_odr_hz: DEFAULT_RUNTIME_ODR_HZ,
            poll_interval_ms: POLL_INTERVAL_MS,
            idle_interval_ms: IDLE_INTERVAL_MS,
        }
    }
}

impl SamplerConfig {
    /// Polling preset: no interrupts, 0.5 Hz
    pub fn polling() -> Self {
        Self {
            trigger_mode: TriggerMode::Disabled,
            ..Self::default()
        }
    }

    /// Data-ready preset at 1 Hz
    pub fn runtime_odr() -> Self {
        Self {
            trigger_mode: TriggerMode::RuntimeOdr,
            ..Self::default()
        }
    }

    /// Resolve the operating mode
    pub fn sampling_mode(&self) -> SamplingMode {
        match self.trigger_mode {
            TriggerMode::Disabled => SamplingMode::Polling {
                interval_ms: self.poll_interval_ms,
            },
            TriggerMode::RuntimeOdr => SamplingMode::RuntimeOdr {
                sampling_hz: self.runtime_odr_hz,
            },
            TriggerMode::FixedDuration => SamplingMode::FixedDuration {
                threshold_m_s2: self.slope_threshold_m_s2,
                duration_s: self.slope_duration_s,
            },
        }
    }

    /// Overrun markers are only meaningful when samples are interrupt driven
    pub fn report_overrun(&self) -> bool {
        self.trigger_mode != TriggerMode::Disabled
    }
}

/// Operating mode, chosen once at startup
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SamplingMode {
    /// Fetch on a fixed period; no trigger is registered
    Polling {
        /// Time between fetches (ms)
        interval_ms: u64,
    },
    /// Program the sampling frequency and arm the data-ready trigger
    RuntimeOdr {
        /// Sampling frequency written to the device (Hz)
        sampling_hz: u32,
    },
    /// Program slope threshold and duration and arm the delta trigger
    FixedDuration {
        /// Slope threshold (m/s²)
        threshold_m_s2: f64,
        /// Slope duration (s)
        duration_s: f64,
    },
}

impl SamplingMode {
    /// Samples arrive through a trigger rather than a timer
    pub fn is_interrupt_driven(&self) -> bool {
        !matches!(self, Self::Polling { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_maximums() {
        assert_eq!(FullScaleRange::G2.max_m_s2(), 19.6133);
        assert_eq!(FullScaleRange::G16.max_m_s2(), 156.9064);
    }

    #[test]
    fn top_tier_depends_on_power_mode() {
        assert_eq!(OdrTier::Max(PowerMode::LowPower).hz(), 1250);
        assert_eq!(OdrTier::Max(PowerMode::Normal).hz(), 5000);
        assert_eq!(OdrTier::Max(PowerMode::LowPower).activity_max_seconds(), 0.1016);
    }

    #[test]
    fn period_uses_integer_division() {
        assert_eq!(OdrTier::Hz1.period_ms(), 1000);
        assert_eq!(OdrTier::Hz100.period_ms(), 10);
        assert_eq!(OdrTier::Hz400.period_ms(), 2);
        assert_eq!(OdrTier::Hz1600.period_ms(), 0);
    }

    #[test]
    fn default_resolves_to_fixed_duration() {
        let mode = SamplerConfig::default().sampling_mode();
        assert_eq!(
            mode,
            SamplingMode::FixedDuration { threshold_m_s2: 10.0, duration_s: 0.1 }
        );
        assert!(mode.is_interrupt_driven());
    }

    #[test]
    fn polling_hides_overrun() {
        let config = SamplerConfig::polling();
        assert!(!config.report_overrun());
        assert_eq!(config.sampling_mode(), SamplingMode::Polling { interval_ms: 2000 });
        assert!(SamplerConfig::runtime_odr().report_overrun());
    }
}
