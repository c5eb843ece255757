//! Harmonic table — the cosine and sine coefficient arrays.
//!
//! Index 0 is the DC term; formulas only ever fill 1..L-1. Reads hand out
//! the live backing slices.

use std::fmt;

/// Number of coefficients per array.
pub const HARMONIC_COUNT: usize = 32;

/// Which coefficient array an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoefficientKind {
    Cosine,
    Sine,
}

impl CoefficientKind {
    pub const ALL: [CoefficientKind; 2] = [CoefficientKind::Cosine, CoefficientKind::Sine];

    pub fn name(self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Sine => "sine",
        }
    }

    /// The other array.
    pub fn other(self) -> Self {
        match self {
            Self::Cosine => Self::Sine,
            Self::Sine => Self::Cosine,
        }
    }
}

impl fmt::Display for CoefficientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// The Fourier coefficient table.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicTable {
    cosine: [f32; HARMONIC_COUNT],
    sine: [f32; HARMONIC_COUNT],
}

/// An owned copy of the table, taken when playback starts.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSnapshot {
    pub cosine: Vec<f32>,
    pub sine: Vec<f32>,
}

impl HarmonicTable {
    /// All coefficients zero.
    pub fn new() -> Self {
        Self {
            cosine: [0.0; HARMONIC_COUNT],
            sine: [0.0; HARMONIC_COUNT],
        }
    }

    /// Overwrite one coefficient.
    ///
    /// # Panics
    ///
    /// If `index >= HARMONIC_COUNT`.
    pub fn set_coefficient(&mut self, kind: CoefficientKind, index: usize, value: f32) {
        self.get_mut(kind)[index] = value;
    }

    /// Overwrite a contiguous run starting at `start`.
    ///
    /// # Panics
    ///
    /// If the run extends past the end of the table.
    pub fn bulk_set(&mut self, kind: CoefficientKind, start: usize, values: &[f32]) {
        self.get_mut(kind)[start..start + values.len()].copy_from_slice(values);
    }

    /// Zero one coefficient.
    pub fn reset(&mut self, kind: CoefficientKind, index: usize) {
        self.set_coefficient(kind, index, 0.0);
    }

    pub fn coefficient(&self, kind: CoefficientKind, index: usize) -> f32 {
        self.get(kind)[index]
    }

    pub fn get(&self, kind: CoefficientKind) -> &[f32] {
        match kind {
            CoefficientKind::Cosine => &self.cosine,
            CoefficientKind::Sine => &self.sine,
        }
    }

    fn get_mut(&mut self, kind: CoefficientKind) -> &mut [f32] {
        match kind {
            CoefficientKind::Cosine => &mut self.cosine,
            CoefficientKind::Sine => &mut self.sine,
        }
    }

    pub fn cosine(&self) -> &[f32] {
        &self.cosine
    }

    pub fn sine(&self) -> &[f32] {
        &self.sine
    }

    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            cosine: self.cosine.to_vec(),
            sine: self.sine.to_vec(),
        }
    }
}

impl Default for HarmonicTable {
    fn default() -> Self {
        Self::new()
    }
}
