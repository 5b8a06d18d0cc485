//! Settings file
//!
//! Optional JSON document selecting the sampler configuration and the
//! behaviour of the simulated device. Every field has a default, so an
//! absent file or `{}` runs the fixed-duration motion trigger at ±2g and
//! 100 Hz.
//!
//! ```json
//! {
//!   "sampler": { "range": "4g", "odr": "hz50", "trigger_mode": "runtime_odr" },
//!   "max_samples": 20,
//!   "simulation": { "motion_interval_ms": 1500, "overrun_every": 7 }
//! }
//! ```

use std::path::{Path, PathBuf};

use accelwatch_core::SamplerConfig;
use serde::Deserialize;
use thiserror::Error;

/// Settings loading errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Cannot read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid settings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Simulated device behaviour
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Delay between simulated motion interrupts (ms)
    pub motion_interval_ms: u64,
    /// Report an overrun every n fetches
    pub overrun_every: Option<u32>,
    /// Noise generator seed
    pub seed: u32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            motion_interval_ms: 3000,
            overrun_every: None,
            seed: 0x2545_f491,
        }
    }
}

/// Top-level settings document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sampler: SamplerConfig,
    /// Stop after this many samples; run forever when absent
    pub max_samples: Option<u32>,
    pub simulation: SimulationSettings,
}

impl Settings {
    /// Parse a settings document
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accelwatch_core::{FullScaleRange, OdrTier, PowerMode, TriggerMode};
    use std::io::Write;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn partial_sampler_section() {
        let settings = Settings::from_json(
            r#"{
                "sampler": { "range": "16g", "odr": { "max": "low_power" }, "trigger_mode": "disabled",
                             "measure_temperature": true },
                "max_samples": 3
            }"#,
        )
        .unwrap();

        assert_eq!(settings.sampler.range, FullScaleRange::G16);
        assert_eq!(settings.sampler.odr, OdrTier::Max(PowerMode::LowPower));
        assert_eq!(settings.sampler.trigger_mode, TriggerMode::Disabled);
        assert!(settings.sampler.measure_temperature);
        assert_eq!(settings.sampler.slope_duration_s, 0.1);
        assert_eq!(settings.max_samples, Some(3));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "sampler": {{ "odr": "hz10" }} }}"#).unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.sampler.odr, OdrTier::Hz10);
    }

    #[test]
    fn missing_file_and_bad_json() {
        let err = Settings::load(Some(Path::new("/nonexistent/accelwatch.json"))).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"sampler\": 5 }}").unwrap();
        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(Settings::load(None).unwrap(), Settings::default());
    }
}
