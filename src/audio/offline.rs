//! Offline graph — renders the signal graph in-process, no device needed.
//!
//! Used when no output device is available and in tests. Each analyser
//! pull renders one fresh window of audio, so the trace is the same one a
//! live device would show.

use super::analyser::{Analyser, FFT_SIZE};
use super::command::{AudioCommand, OscillatorId};
use super::graph::{AudioGraph, OscillatorNode};
use super::periodic_wave::PeriodicWave;
use super::signal::SignalGraph;
use super::AudioError;

/// Default sample rate when no device dictates one.
pub const OFFLINE_SAMPLE_RATE: u32 = 48_000;

pub struct OfflineGraph {
    graph: SignalGraph,
    analyser: Analyser,
    scratch: Vec<f32>,
    next_id: u64,
    created: u64,
}

impl OfflineGraph {
    pub fn new(sample_rate: u32, frequency_hz: f64) -> Self {
        Self {
            graph: SignalGraph::new(sample_rate, frequency_hz),
            analyser: Analyser::new(FFT_SIZE),
            scratch: vec![0.0; FFT_SIZE],
            next_id: 0,
            created: 0,
        }
    }

    /// Render `frames` samples into the analyser window.
    pub fn render(&mut self, frames: usize) {
        self.scratch.resize(frames, 0.0);
        self.graph.render(&mut self.scratch);
        self.analyser.push(&self.scratch);
    }

    /// Total oscillators ever created.
    pub fn oscillators_created(&self) -> u64 {
        self.created
    }

    /// Oscillators still present in the graph (created and not disconnected).
    pub fn live_oscillators(&self) -> usize {
        self.graph.oscillator_count()
    }

    /// Oscillators currently producing sound.
    pub fn audible_oscillators(&self) -> usize {
        self.graph.audible_count()
    }

    pub fn gain(&self) -> f32 {
        self.graph.gain()
    }
}

impl Default for OfflineGraph {
    fn default() -> Self {
        Self::new(OFFLINE_SAMPLE_RATE, 440.0)
    }
}

impl AudioGraph for OfflineGraph {
    fn create_oscillator(&mut self, wave: PeriodicWave) -> Result<OscillatorNode, AudioError> {
        self.next_id += 1;
        self.created += 1;
        let id = OscillatorId(self.next_id);
        self.graph.apply(AudioCommand::CreateOscillator { id, wave });
        Ok(OscillatorNode::new(id))
    }

    fn connect(&mut self, node: &OscillatorNode) -> Result<(), AudioError> {
        self.graph.apply(AudioCommand::Connect(node.id()));
        Ok(())
    }

    fn start(&mut self, node: &OscillatorNode) -> Result<(), AudioError> {
        self.graph.apply(AudioCommand::Start(node.id()));
        Ok(())
    }

    fn stop(&mut self, node: &OscillatorNode) -> Result<(), AudioError> {
        self.graph.apply(AudioCommand::Stop(node.id()));
        Ok(())
    }

    fn disconnect(&mut self, node: OscillatorNode) -> Result<(), AudioError> {
        self.graph.apply(AudioCommand::Disconnect(node.id()));
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) -> Result<(), AudioError> {
        self.graph.apply(AudioCommand::SetGain(gain));
        Ok(())
    }

    fn time_domain_data(&mut self, buffer: &mut [f32]) {
        self.render(self.analyser.fft_size());
        self.analyser.get_float_time_domain_data(buffer);
    }

    fn device_name(&self) -> &str {
        "offline"
    }

    fn is_live(&self) -> bool {
        false
    }
}
