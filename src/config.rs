//! Configuration — YAML settings at ~/.harmonics/config.yaml.
//!
//! Every field has a default, so a partial file (or none at all) is fine.
//! Command-line flags override whatever is loaded here.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::synth::{SynthSettings, CUSTOM};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonicsConfig {
    /// Master gain, 0.0..=1.0.
    pub gain: f32,
    /// Oscillator fundamental.
    pub frequency_hz: f64,
    /// Delay between an edit and the chart's sample pull.
    pub refresh_delay_ms: u64,
    /// Drop pending sample pulls when playback stops.
    pub cancel_refresh_on_stop: bool,
    /// Wave applied at startup.
    pub initial_wave: String,
    /// Output sample rate. None = device default.
    pub sample_rate: Option<u32>,
}

impl Default for HarmonicsConfig {
    fn default() -> Self {
        Self {
            gain: 0.5,
            frequency_hz: 440.0,
            refresh_delay_ms: 100,
            cancel_refresh_on_stop: false,
            initial_wave: CUSTOM.to_string(),
            sample_rate: None,
        }
    }
}

impl HarmonicsConfig {
    /// Load from the standard path. None if the file is missing or invalid.
    pub fn load() -> Option<Self> {
        let content = std::fs::read_to_string(default_config_path()).ok()?;
        serde_yaml::from_str(&content).ok()
    }

    pub fn synth_settings(&self) -> SynthSettings {
        SynthSettings {
            gain: self.gain.clamp(0.0, 1.0),
            refresh_delay: Duration::from_millis(self.refresh_delay_ms),
            cancel_on_stop: self.cancel_refresh_on_stop,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".harmonics");
    path.push("config.yaml");
    path
}

/// Load a config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<HarmonicsConfig, io::Error> {
    if !path.exists() {
        return Ok(HarmonicsConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Save a config file, creating parent directories as needed.
pub fn save_config(path: &Path, config: &HarmonicsConfig) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(config).map_err(io::Error::other)?;
    std::fs::write(path, yaml)
}
