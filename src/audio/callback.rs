//! Audio callback — runs on the cpal audio thread.
//!
//! Drains commands from the ring buffer, renders the signal graph, feeds the
//! analysis tap, limits and fans the mono signal out to every output channel.

use ringbuf::traits::{Consumer, Producer};
use ringbuf::{HeapCons, HeapProd};

use super::command::AudioCommand;
use super::signal::{Limiter, SignalGraph};

/// Mono scratch frames reserved up front so the callback rarely allocates.
const SCRATCH_FRAMES: usize = 8192;

/// State that lives on the audio thread. Accessed only from the cpal callback.
pub struct AudioCallback {
    consumer: HeapCons<AudioCommand>,
    tap: HeapProd<f32>,
    graph: SignalGraph,
    limiter: Limiter,
    mono: Vec<f32>,
    channels: u16,
}

impl AudioCallback {
    pub fn new(
        consumer: HeapCons<AudioCommand>,
        tap: HeapProd<f32>,
        channels: u16,
        sample_rate: u32,
        frequency_hz: f64,
    ) -> Self {
        Self {
            consumer,
            tap,
            graph: SignalGraph::new(sample_rate, frequency_hz),
            limiter: Limiter::default(),
            mono: Vec::with_capacity(SCRATCH_FRAMES),
            channels: channels.max(1),
        }
    }

    /// Called by cpal for each output buffer. `output` is interleaved.
    pub fn process(&mut self, output: &mut [f32]) {
        // 1. Drain all pending commands from the ring buffer.
        while let Some(cmd) = self.consumer.try_pop() {
            self.graph.apply(cmd);
        }

        // 2. Render one mono sample per frame.
        let channels = self.channels as usize;
        let frames = output.len() / channels;
        self.mono.resize(frames, 0.0);
        self.graph.render(&mut self.mono);

        // 3. Feed the analyser. A full tap drops samples rather than block.
        self.tap.push_slice(&self.mono);

        // 4. Limit what reaches the device.
        self.limiter.process_block(&mut self.mono);

        // 5. Duplicate to every channel.
        for (frame, &sample) in output.chunks_mut(channels).zip(self.mono.iter()) {
            frame.fill(sample);
        }
        // Trailing partial frame, if any.
        for sample in output[frames * channels..].iter_mut() {
            *sample = 0.0;
        }
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}
