//! Harmonic slider bank — cursor over the coefficient grid and bar rendering.
//!
//! Sliders span [-2, 2] in steps of 0.01, one cosine and one sine slider per
//! harmonic index including the DC term.

use crate::synth::{CoefficientKind, HARMONIC_COUNT};

pub const SLIDER_MIN: f32 = -2.0;
pub const SLIDER_MAX: f32 = 2.0;
pub const FINE_STEP: f32 = 0.01;
pub const COARSE_STEP: f32 = 0.1;

/// Block glyphs, quietest first.
const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Which slider is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarmonicCursor {
    pub kind: CoefficientKind,
    pub index: usize,
}

impl Default for HarmonicCursor {
    fn default() -> Self {
        Self {
            kind: CoefficientKind::Sine,
            index: 1,
        }
    }
}

impl HarmonicCursor {
    /// Move along the row, clamped to the table.
    pub fn step(&mut self, delta: i32) {
        let max = HARMONIC_COUNT as i64 - 1;
        self.index = (self.index as i64 + i64::from(delta)).clamp(0, max) as usize;
    }

    pub fn select_row(&mut self, kind: CoefficientKind) {
        self.kind = kind;
    }
}

/// Apply a slider nudge: clamp to the slider range and snap to the fine step.
pub fn nudge(value: f32, delta: f32) -> f32 {
    let v = (value + delta).clamp(SLIDER_MIN, SLIDER_MAX);
    (v / FINE_STEP).round() * FINE_STEP
}

/// One-cell glyph for a coefficient. Height follows magnitude; sign is left
/// to the caller's color.
pub fn level_glyph(value: f32) -> char {
    if value == 0.0 || value.is_nan() {
        return '·';
    }
    let ratio = (value.abs() / SLIDER_MAX).min(1.0);
    let idx = ((ratio * LEVELS.len() as f32).ceil() as usize).clamp(1, LEVELS.len()) - 1;
    LEVELS[idx]
}

/// A horizontal slider of `width` cells with the handle at `value`.
pub fn slider_bar(value: f32, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let span = SLIDER_MAX - SLIDER_MIN;
    let ratio = if value.is_finite() {
        ((value.clamp(SLIDER_MIN, SLIDER_MAX) - SLIDER_MIN) / span) as f64
    } else {
        0.5
    };
    let handle = (ratio * (width - 1) as f64).round() as usize;
    let center = (width - 1) / 2;
    (0..width)
        .map(|i| {
            if i == handle {
                '●'
            } else if i == center {
                '┼'
            } else {
                '─'
            }
        })
        .collect()
}
