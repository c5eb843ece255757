//! Harmonics — a terminal additive-synthesis visualizer.
//!
//! Edit cosine and sine coefficients per harmonic (directly or through
//! formulas in `n`), hear the resulting periodic wave and watch its trace.

pub mod audio;
pub mod cli;
pub mod config;
pub mod formula;
pub mod synth;
pub mod tui;
