//! Periodic wave — a single-cycle wavetable built from Fourier coefficients.
//!
//! `real[k]` scales `cos(2πk·t)` and `imag[k]` scales `sin(2πk·t)` for one
//! cycle `t ∈ [0, 1)`. Index 0 (the DC term) is ignored, matching the usual
//! periodic-wave contract of audio graphs.

use std::f64::consts::TAU;

/// Number of samples in one rendered cycle.
pub const WAVETABLE_SIZE: usize = 2048;

/// Options for building a [`PeriodicWave`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeriodicWaveOptions {
    /// When `false`, the table is scaled so its peak magnitude is 1.
    /// When `true`, amplitudes are exactly what the coefficients encode.
    pub disable_normalization: bool,
}

/// One cycle of a waveform, sampled at [`WAVETABLE_SIZE`] points.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicWave {
    table: Vec<f32>,
}

impl PeriodicWave {
    /// Sum the harmonic series into a wavetable.
    ///
    /// The shorter of `real`/`imag` bounds the harmonic count. Non-finite
    /// coefficients are not filtered and poison the table.
    pub fn new(real: &[f32], imag: &[f32], options: PeriodicWaveOptions) -> Self {
        let harmonics = real.len().min(imag.len());
        let mut table = vec![0.0f32; WAVETABLE_SIZE];

        for (i, slot) in table.iter_mut().enumerate() {
            let t = i as f64 / WAVETABLE_SIZE as f64;
            let mut acc = 0.0f64;
            for k in 1..harmonics {
                let angle = TAU * k as f64 * t;
                acc += f64::from(real[k]) * angle.cos() + f64::from(imag[k]) * angle.sin();
            }
            *slot = acc as f32;
        }

        if !options.disable_normalization {
            let peak = table.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
            if peak > 0.0 {
                for s in table.iter_mut() {
                    *s /= peak;
                }
            }
        }

        Self { table }
    }

    /// Read the waveform at `phase ∈ [0, 1)` with linear interpolation.
    pub fn sample(&self, phase: f64) -> f32 {
        let pos = phase.rem_euclid(1.0) * WAVETABLE_SIZE as f64;
        let idx = pos.floor() as usize % WAVETABLE_SIZE;
        let next = (idx + 1) % WAVETABLE_SIZE;
        let frac = (pos - pos.floor()) as f32;
        self.table[idx] + (self.table[next] - self.table[idx]) * frac
    }

    /// The raw single-cycle table.
    pub fn table(&self) -> &[f32] {
        &self.table
    }
}
