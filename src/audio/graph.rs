//! Audio graph seam — the operations the synth needs from an audio backend.
//!
//! The graph is oscillator → gain → analyser → destination. Implementations:
//! [`AudioEngine`](super::AudioEngine) drives a real device,
//! [`OfflineGraph`](super::OfflineGraph) renders in-process.

use super::command::OscillatorId;
use super::periodic_wave::PeriodicWave;
use super::AudioError;

/// Handle to an oscillator node.
///
/// Not `Clone`: [`AudioGraph::disconnect`] consumes the handle, so a torn-down
/// oscillator cannot be touched again.
#[derive(Debug, PartialEq, Eq)]
pub struct OscillatorNode {
    id: OscillatorId,
}

impl OscillatorNode {
    pub fn new(id: OscillatorId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> OscillatorId {
        self.id
    }
}

/// An audio signal graph the synth can drive.
pub trait AudioGraph {
    /// Create an oscillator playing `wave`. It is neither connected nor started.
    fn create_oscillator(&mut self, wave: PeriodicWave) -> Result<OscillatorNode, AudioError>;

    /// Connect the oscillator to the gain stage.
    fn connect(&mut self, node: &OscillatorNode) -> Result<(), AudioError>;

    /// Begin generation.
    fn start(&mut self, node: &OscillatorNode) -> Result<(), AudioError>;

    /// Halt generation for good.
    fn stop(&mut self, node: &OscillatorNode) -> Result<(), AudioError>;

    /// Disconnect and release the oscillator.
    fn disconnect(&mut self, node: OscillatorNode) -> Result<(), AudioError>;

    /// Set the gain stage, 0.0 to 1.0.
    fn set_gain(&mut self, gain: f32) -> Result<(), AudioError>;

    /// Fill `buffer` with the latest time-domain samples from the analyser.
    fn time_domain_data(&mut self, buffer: &mut [f32]);

    /// Housekeeping once per event-loop tick.
    fn pump(&mut self) {}

    /// Human-readable output name for the status bar.
    fn device_name(&self) -> &str;

    /// Whether sound actually reaches a device.
    fn is_live(&self) -> bool;
}

impl<G: AudioGraph + ?Sized> AudioGraph for Box<G> {
    fn create_oscillator(&mut self, wave: PeriodicWave) -> Result<OscillatorNode, AudioError> {
        (**self).create_oscillator(wave)
    }

    fn connect(&mut self, node: &OscillatorNode) -> Result<(), AudioError> {
        (**self).connect(node)
    }

    fn start(&mut self, node: &OscillatorNode) -> Result<(), AudioError> {
        (**self).start(node)
    }

    fn stop(&mut self, node: &OscillatorNode) -> Result<(), AudioError> {
        (**self).stop(node)
    }

    fn disconnect(&mut self, node: OscillatorNode) -> Result<(), AudioError> {
        (**self).disconnect(node)
    }

    fn set_gain(&mut self, gain: f32) -> Result<(), AudioError> {
        (**self).set_gain(gain)
    }

    fn time_domain_data(&mut self, buffer: &mut [f32]) {
        (**self).time_domain_data(buffer)
    }

    fn pump(&mut self) {
        (**self).pump()
    }

    fn device_name(&self) -> &str {
        (**self).device_name()
    }

    fn is_live(&self) -> bool {
        (**self).is_live()
    }
}
