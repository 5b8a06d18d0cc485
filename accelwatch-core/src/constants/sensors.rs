//! LIS2DH Accelerometer Specifications and Limits
//!
//! Full-scale ranges, output data rate tiers and the register widths that
//! bound the motion (slope) interrupt configuration.
//!
//! Source: ST LIS2DH12 datasheet, sections 8.22 (INTx_THS) and 8.23 (INTx_DURATION)

// ===== FULL-SCALE RANGE LIMITS =====

/// Standard gravity (m/s²).
///
/// Source: CGPM 1901
pub const STANDARD_GRAVITY_M_S2: f64 = 9.80665;

/// Largest reportable acceleration at ±2g (m/s²).
pub const ACCEL_RANGE_MAX_2G_M_S2: f64 = 19.6133;

/// Largest reportable acceleration at ±4g (m/s²).
pub const ACCEL_RANGE_MAX_4G_M_S2: f64 = 39.2266;

/// Largest reportable acceleration at ±8g (m/s²).
pub const ACCEL_RANGE_MAX_8G_M_S2: f64 = 78.4532;

/// Largest reportable acceleration at ±16g (m/s²).
pub const ACCEL_RANGE_MAX_16G_M_S2: f64 = 156.9064;

// ===== INTERRUPT REGISTER WIDTHS =====

/// Largest value the 7-bit INTx_DURATION register accepts (ODR periods).
///
/// Every entry in the ODR tier table is derived from this:
/// `ACTIVITY_MAX_SECONDS = ACTIVITY_MAX_COUNT / ODR`.
pub const ACTIVITY_MAX_COUNT: u8 = 127;

/// Fixed-point scale of device attribute values (micro-units).
pub const MICRO_SCALE: u64 = 1_000_000;

// ===== OUTPUT DATA RATE TIERS =====
//
// (ODR in Hz, longest encodable duration in seconds)

/// Tier 1: 1 Hz.
pub const ODR_TIER_1: (u32, f64) = (1, 127.0);

/// Tier 2: 10 Hz.
pub const ODR_TIER_2: (u32, f64) = (10, 12.7);

/// Tier 3: 25 Hz.
pub const ODR_TIER_3: (u32, f64) = (25, 5.08);

/// Tier 4: 50 Hz.
pub const ODR_TIER_4: (u32, f64) = (50, 2.54);

/// Tier 5: 100 Hz.
pub const ODR_TIER_5: (u32, f64) = (100, 1.27);

/// Tier 6: 200 Hz.
pub const ODR_TIER_6: (u32, f64) = (200, 0.635);

/// Tier 7: 400 Hz.
pub const ODR_TIER_7: (u32, f64) = (400, 0.3175);

/// Tier 8: 1.6 kHz (low-power mode only on the part).
pub const ODR_TIER_8: (u32, f64) = (1600, 0.079375);

/// Tier 9 in low-power mode.
pub const ODR_TIER_9_LOW_POWER: (u32, f64) = (1250, 0.1016);

/// Tier 9 in normal mode.
pub const ODR_TIER_9_NORMAL: (u32, f64) = (5000, 0.0254);

// ===== STARTUP DEFAULTS =====

/// Motion threshold programmed in fixed-duration mode (m/s²).
pub const DEFAULT_SLOPE_THRESHOLD_M_S2: f64 = 10.0;

/// Motion duration programmed in fixed-duration mode (s).
pub const DEFAULT_SLOPE_DURATION_S: f64 = 0.1;

/// Sampling frequency requested in runtime-ODR mode (Hz).
pub const DEFAULT_RUNTIME_ODR_HZ: u32 = 1;

/// Device name reported when the driver does not supply one.
pub const DEFAULT_DEVICE_NAME: &str = "lis2dh";
