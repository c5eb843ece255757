//! Audio engine — dedicated thread, lock-free queues, periodic-wave oscillators.
//!
//! The engine owns the cpal output stream. The main thread sends
//! [`AudioCommand`]s to the audio thread over one ring buffer; the audio
//! thread sends rendered samples back over a second one for the analyser.

pub mod analyser;
pub mod callback;
pub mod command;
pub mod graph;
pub mod offline;
pub mod oscillator;
pub mod periodic_wave;
pub mod signal;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::{
    traits::{Producer, Split},
    HeapRb,
};

pub use analyser::{Analyser, FFT_SIZE};
pub use command::{AudioCommand, OscillatorId};
pub use graph::{AudioGraph, OscillatorNode};
pub use offline::OfflineGraph;
pub use periodic_wave::{PeriodicWave, PeriodicWaveOptions};

use callback::AudioCallback;

/// Ring buffer capacity (number of commands).
const RING_BUFFER_CAPACITY: usize = 1024;

/// Analysis tap capacity in samples; drained every event-loop tick.
const TAP_CAPACITY: usize = FFT_SIZE * 16;

/// Audio engine errors.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// No audio output device found.
    NoOutputDevice,
    /// Failed to query device configuration.
    DeviceConfig(String),
    /// Failed to build the audio stream.
    StreamBuild(String),
    /// Failed to start the audio stream.
    StreamPlay(String),
    /// Ring buffer is full; the audio thread is not draining fast enough.
    BufferFull,
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::NoOutputDevice => write!(f, "no audio output device found"),
            AudioError::DeviceConfig(e) => write!(f, "device config error: {e}"),
            AudioError::StreamBuild(e) => write!(f, "stream build error: {e}"),
            AudioError::StreamPlay(e) => write!(f, "stream play error: {e}"),
            AudioError::BufferFull => write!(f, "audio command ring buffer is full"),
        }
    }
}

impl std::error::Error for AudioError {}

/// The audio engine. Owns the cpal stream, the command producer and the analyser.
///
/// Created on the main thread; implements [`AudioGraph`] by sending commands
/// to the audio thread.
pub struct AudioEngine {
    stream: cpal::Stream,
    producer: ringbuf::HeapProd<AudioCommand>,
    analyser: Analyser,
    sample_rate: u32,
    channels: u16,
    device_name: String,
    next_id: u64,
}

impl AudioEngine {
    /// Create and start the audio engine with the default output device.
    pub fn new(frequency_hz: f64) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels();

        Self::build_with_device(&device, sample_rate, channels, frequency_hz)
    }

    /// Create the audio engine with a specific sample rate.
    ///
    /// Uses the default output device and its channel count.
    pub fn with_sample_rate(sample_rate: u32, frequency_hz: f64) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let channels = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?
            .channels();

        Self::build_with_device(&device, sample_rate, channels, frequency_hz)
    }

    /// Internal builder: sets up ring buffers, callback, and stream.
    fn build_with_device(
        device: &cpal::Device,
        sample_rate: u32,
        channels: u16,
        frequency_hz: f64,
    ) -> Result<Self, AudioError> {
        let (producer, consumer) = HeapRb::<AudioCommand>::new(RING_BUFFER_CAPACITY).split();
        let (tap_producer, tap_consumer) = HeapRb::<f32>::new(TAP_CAPACITY).split();

        let mut audio_callback =
            AudioCallback::new(consumer, tap_producer, channels, sample_rate, frequency_hz);

        let stream_config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let err_fn = |err: cpal::StreamError| {
            eprintln!("audio stream error: {err}");
        };

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    audio_callback.process(data);
                },
                err_fn,
                None,
            )
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))?;

        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        Ok(Self {
            stream,
            producer,
            analyser: Analyser::with_tap(FFT_SIZE, tap_consumer),
            sample_rate,
            channels,
            device_name,
            next_id: 0,
        })
    }

    fn send(&mut self, cmd: AudioCommand) -> Result<(), AudioError> {
        self.producer
            .try_push(cmd)
            .map_err(|_| AudioError::BufferFull)
    }

    /// Get the sample rate of the audio stream.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the number of output channels.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Pause the audio stream.
    pub fn pause(&self) -> Result<(), AudioError> {
        self.stream
            .pause()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))
    }

    /// Resume the audio stream.
    pub fn play(&self) -> Result<(), AudioError> {
        self.stream
            .play()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))
    }
}

impl AudioGraph for AudioEngine {
    fn create_oscillator(&mut self, wave: PeriodicWave) -> Result<OscillatorNode, AudioError> {
        let id = OscillatorId(self.next_id + 1);
        self.send(AudioCommand::CreateOscillator { id, wave })?;
        self.next_id = id.0;
        Ok(OscillatorNode::new(id))
    }

    fn connect(&mut self, node: &OscillatorNode) -> Result<(), AudioError> {
        self.send(AudioCommand::Connect(node.id()))
    }

    fn start(&mut self, node: &OscillatorNode) -> Result<(), AudioError> {
        self.send(AudioCommand::Start(node.id()))
    }

    fn stop(&mut self, node: &OscillatorNode) -> Result<(), AudioError> {
        self.send(AudioCommand::Stop(node.id()))
    }

    fn disconnect(&mut self, node: OscillatorNode) -> Result<(), AudioError> {
        self.send(AudioCommand::Disconnect(node.id()))
    }

    fn set_gain(&mut self, gain: f32) -> Result<(), AudioError> {
        self.send(AudioCommand::SetGain(gain))
    }

    fn time_domain_data(&mut self, buffer: &mut [f32]) {
        self.analyser.drain_tap();
        self.analyser.get_float_time_domain_data(buffer);
    }

    fn pump(&mut self) {
        self.analyser.drain_tap();
    }

    fn device_name(&self) -> &str {
        &self.device_name
    }

    fn is_live(&self) -> bool {
        true
    }
}
