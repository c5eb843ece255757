//! Signal graph — oscillators → gain, plus the master limiter.
//!
//! Shared by the cpal audio callback and the offline graph, so both render
//! exactly the same signal. Output is mono; the callback fans it out to
//! every device channel. The analyser reads the post-gain signal; only the
//! device output goes through the [`Limiter`].

use super::command::{AudioCommand, OscillatorId};
use super::oscillator::Oscillator;

/// Master ceiling on device output.
pub const LIMITER_CEILING: f32 = 0.95;

/// Hard limiter that clamps samples to `[-ceiling, ceiling]`.
#[derive(Debug, Clone)]
pub struct Limiter {
    ceiling: f32,
}

impl Limiter {
    pub fn new(ceiling: f32) -> Self {
        debug_assert!(ceiling > 0.0 && ceiling <= 1.0);
        Self { ceiling }
    }

    /// Clamp a buffer in place.
    #[inline]
    pub fn process_block(&self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = sample.clamp(-self.ceiling, self.ceiling);
        }
    }

    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }
}

impl Default for Limiter {
    fn default() -> Self {
        Self::new(LIMITER_CEILING)
    }
}

/// Render-side state of the audio graph.
#[derive(Debug)]
pub struct SignalGraph {
    oscillators: Vec<(OscillatorId, Oscillator)>,
    gain: f32,
    frequency_hz: f64,
    sample_rate: u32,
}

impl SignalGraph {
    pub fn new(sample_rate: u32, frequency_hz: f64) -> Self {
        Self {
            oscillators: Vec::new(),
            gain: 1.0,
            frequency_hz,
            sample_rate,
        }
    }

    /// Apply a command from the control side.
    pub fn apply(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::CreateOscillator { id, wave } => {
                let osc = Oscillator::new(wave, self.frequency_hz, self.sample_rate);
                self.oscillators.push((id, osc));
            }
            AudioCommand::Connect(id) => {
                if let Some(osc) = self.oscillator_mut(id) {
                    osc.connect();
                }
            }
            AudioCommand::Start(id) => {
                if let Some(osc) = self.oscillator_mut(id) {
                    osc.start();
                }
            }
            AudioCommand::Stop(id) => {
                if let Some(osc) = self.oscillator_mut(id) {
                    osc.stop();
                }
            }
            AudioCommand::Disconnect(id) => {
                // A disconnected node can never be heard again, so drop it.
                self.oscillators.retain(|(oid, _)| *oid != id);
            }
            AudioCommand::SetGain(g) => {
                self.gain = g.clamp(0.0, 1.0);
            }
        }
    }

    /// Fill `output` with the next block of mono post-gain samples, unclamped.
    pub fn render(&mut self, output: &mut [f32]) {
        output.fill(0.0);
        for (_, osc) in self.oscillators.iter_mut() {
            osc.render_add(output);
        }
        for sample in output.iter_mut() {
            *sample *= self.gain;
        }
    }

    fn oscillator_mut(&mut self, id: OscillatorId) -> Option<&mut Oscillator> {
        self.oscillators
            .iter_mut()
            .find(|(oid, _)| *oid == id)
            .map(|(_, osc)| osc)
    }

    /// Number of oscillator nodes alive in the graph.
    pub fn oscillator_count(&self) -> usize {
        self.oscillators.len()
    }

    /// Number of oscillators currently producing sound.
    pub fn audible_count(&self) -> usize {
        self.oscillators
            .iter()
            .filter(|(_, osc)| osc.is_audible())
            .count()
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
