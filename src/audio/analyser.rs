//! Analysis tap — keeps the most recent `fft_size` output samples.
//!
//! On a live device the audio thread pushes rendered samples into a ring
//! buffer; [`Analyser::drain_tap`] moves them into the window on the main
//! thread. The offline graph pushes directly.

use ringbuf::traits::Consumer;
use ringbuf::HeapCons;

/// Number of samples in one time-domain snapshot.
pub const FFT_SIZE: usize = 1024;

/// Samples moved per `pop_slice` when draining the tap.
const DRAIN_CHUNK: usize = 256;

/// Rolling window of the latest output samples.
pub struct Analyser {
    window: Vec<f32>,
    write_pos: usize,
    tap: Option<HeapCons<f32>>,
}

impl Analyser {
    /// Create an analyser fed by explicit [`push`](Analyser::push) calls.
    pub fn new(fft_size: usize) -> Self {
        Self {
            window: vec![0.0; fft_size.max(1)],
            write_pos: 0,
            tap: None,
        }
    }

    /// Create an analyser fed from an audio-thread ring buffer.
    pub fn with_tap(fft_size: usize, tap: HeapCons<f32>) -> Self {
        Self {
            tap: Some(tap),
            ..Self::new(fft_size)
        }
    }

    pub fn fft_size(&self) -> usize {
        self.window.len()
    }

    /// Append samples, overwriting the oldest.
    pub fn push(&mut self, samples: &[f32]) {
        let len = self.window.len();
        for &s in samples {
            self.window[self.write_pos] = s;
            self.write_pos = (self.write_pos + 1) % len;
        }
    }

    /// Move everything pending in the tap into the window.
    pub fn drain_tap(&mut self) {
        let mut chunk = [0.0f32; DRAIN_CHUNK];
        loop {
            let n = match self.tap.as_mut() {
                Some(tap) => tap.pop_slice(&mut chunk),
                None => return,
            };
            if n == 0 {
                break;
            }
            self.push(&chunk[..n]);
        }
    }

    /// Copy the window, oldest sample first, into `buffer`.
    ///
    /// Copies at most `fft_size` samples; a longer buffer keeps its tail.
    pub fn get_float_time_domain_data(&self, buffer: &mut [f32]) {
        let len = self.window.len();
        for (i, out) in buffer.iter_mut().take(len).enumerate() {
            *out = self.window[(self.write_pos + i) % len];
        }
    }
}
