//! Oscillator node — a phase accumulator reading a [`PeriodicWave`].
//!
//! Oscillators are single-use: once stopped they never produce sound again.

use super::periodic_wave::PeriodicWave;

/// Lifecycle of an oscillator node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorState {
    Created,
    Started,
    Stopped,
}

/// A running or runnable oscillator.
#[derive(Debug, Clone)]
pub struct Oscillator {
    wave: PeriodicWave,
    phase: f64,
    increment: f64,
    state: OscillatorState,
    connected: bool,
}

impl Oscillator {
    /// Create an oscillator at `frequency_hz` for the given sample rate.
    pub fn new(wave: PeriodicWave, frequency_hz: f64, sample_rate: u32) -> Self {
        Self {
            wave,
            phase: 0.0,
            increment: frequency_hz / f64::from(sample_rate.max(1)),
            state: OscillatorState::Created,
            connected: false,
        }
    }

    pub fn state(&self) -> OscillatorState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn connect(&mut self) {
        self.connected = true;
    }

    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Begin generation. Ignored unless freshly created.
    pub fn start(&mut self) {
        if self.state == OscillatorState::Created {
            self.state = OscillatorState::Started;
        }
    }

    /// Halt generation permanently.
    pub fn stop(&mut self) {
        self.state = OscillatorState::Stopped;
    }

    /// Whether this oscillator contributes to the output right now.
    pub fn is_audible(&self) -> bool {
        self.connected && self.state == OscillatorState::Started
    }

    /// Add this oscillator's output into `buffer`. Silent oscillators still
    /// leave the buffer untouched.
    pub fn render_add(&mut self, buffer: &mut [f32]) {
        if !self.is_audible() {
            return;
        }
        for out in buffer.iter_mut() {
            *out += self.wave.sample(self.phase);
            self.phase += self.increment;
            if self.phase >= 1.0 {
                self.phase -= 1.0;
            }
        }
    }
}
