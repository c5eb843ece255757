//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::config::HarmonicsConfig;

/// Command line arguments. Anything given here overrides the config file.
#[derive(Parser, Debug)]
#[command(name = "harmonics")]
#[command(about = "Additive-synthesis visualizer: edit Fourier coefficients, hear and see the wave", long_about = None)]
pub struct Args {
    /// Config file (default: ~/.harmonics/config.yaml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Wave to load at startup: sine, triangle, square, saw
    #[arg(long, value_name = "NAME")]
    pub wave: Option<String>,

    /// Master gain, 0.0 to 1.0
    #[arg(long, value_name = "GAIN")]
    pub gain: Option<f32>,

    /// Fundamental frequency in Hz
    #[arg(long, value_name = "HZ")]
    pub frequency: Option<f64>,

    /// Run without an audio device
    #[arg(long)]
    pub no_audio: bool,

    /// Write the effective config to the config path and exit
    #[arg(long)]
    pub write_config: bool,
}

impl Args {
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::default_config_path)
    }

    /// Overlay the flags that were given onto a loaded config.
    pub fn apply(&self, config: &mut HarmonicsConfig) {
        if let Some(wave) = &self.wave {
            config.initial_wave = wave.clone();
        }
        if let Some(gain) = self.gain {
            config.gain = gain.clamp(0.0, 1.0);
        }
        if let Some(frequency) = self.frequency {
            config.frequency_hz = frequency;
        }
    }
}
