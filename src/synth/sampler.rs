//! Waveform sampler — deferred pulls from the analysis tap.
//!
//! While stopped a refresh request only marks the trace stale. While playing
//! it schedules a pull `delay` later, giving the fresh oscillator time to
//! reach the tap. Requests are not coalesced.

use std::time::{Duration, Instant};

use crate::audio::{AudioGraph, FFT_SIZE};

use super::playback::SessionId;

/// Default delay between a refresh request and its pull.
pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingPull {
    due: Instant,
    session: SessionId,
}

#[derive(Debug)]
pub struct WaveformSampler {
    buffer: Vec<f32>,
    needs_update: bool,
    pending: Vec<PendingPull>,
    delay: Duration,
    cancel_on_stop: bool,
}

impl WaveformSampler {
    pub fn new(delay: Duration, cancel_on_stop: bool) -> Self {
        Self {
            buffer: vec![0.0; FFT_SIZE],
            needs_update: false,
            pending: Vec::new(),
            delay,
            cancel_on_stop,
        }
    }

    /// Ask for a fresh trace. `active` is the running session, if any.
    pub fn request_refresh(&mut self, active: Option<SessionId>, now: Instant) {
        match active {
            None => self.needs_update = true,
            Some(session) => {
                self.needs_update = false;
                self.pending.push(PendingPull {
                    due: now + self.delay,
                    session,
                });
            }
        }
    }

    /// Playback just started: schedule the refresh that was held back, if any.
    pub fn on_start(&mut self, session: SessionId, now: Instant) {
        if self.needs_update {
            self.request_refresh(Some(session), now);
        }
    }

    /// Fire every pull that is due. Returns `true` if the buffer was
    /// overwritten.
    pub fn poll<G: AudioGraph + ?Sized>(
        &mut self,
        now: Instant,
        active: Option<SessionId>,
        graph: &mut G,
    ) -> bool {
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|pull| pull.due <= now);
        self.pending = waiting;

        let mut fired = false;
        for pull in due {
            if self.cancel_on_stop && active != Some(pull.session) {
                continue;
            }
            graph.time_domain_data(&mut self.buffer);
            fired = true;
        }
        fired
    }

    /// Latest published samples, oldest first.
    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for WaveformSampler {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_DELAY, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{OfflineGraph, PeriodicWave, PeriodicWaveOptions};

    fn playing_graph() -> OfflineGraph {
        let mut graph = OfflineGraph::default();
        let mut sine = [0.0; 32];
        sine[1] = 1.0;
        let wave = PeriodicWave::new(
            &[0.0; 32],
            &sine,
            PeriodicWaveOptions {
                disable_normalization: true,
            },
        );
        let node = graph.create_oscillator(wave).unwrap();
        graph.connect(&node).unwrap();
        graph.start(&node).unwrap();
        graph
    }

    #[test]
    fn stopped_request_only_sets_flag() {
        let mut graph = playing_graph();
        let mut sampler = WaveformSampler::default();
        let now = Instant::now();
        sampler.request_refresh(None, now);
        assert!(sampler.needs_update());
        assert_eq!(sampler.pending_count(), 0);
        assert!(!sampler.poll(now + Duration::from_secs(1), None, &mut graph));
        assert!(sampler.buffer().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn playing_request_fires_after_delay() {
        let mut graph = playing_graph();
        let mut sampler = WaveformSampler::default();
        let now = Instant::now();
        let session = Some(SessionId(1));
        sampler.request_refresh(session, now);
        assert!(!sampler.needs_update());

        assert!(!sampler.poll(now + Duration::from_millis(50), session, &mut graph));
        assert!(sampler.poll(now + DEFAULT_REFRESH_DELAY, session, &mut graph));
        assert_eq!(sampler.pending_count(), 0);
        assert!(sampler.buffer().iter().any(|&s| s.abs() > 0.5));
    }

    #[test]
    fn requests_are_not_coalesced() {
        let mut sampler = WaveformSampler::default();
        let now = Instant::now();
        sampler.request_refresh(Some(SessionId(1)), now);
        sampler.request_refresh(Some(SessionId(1)), now + Duration::from_millis(10));
        assert_eq!(sampler.pending_count(), 2);
    }

    #[test]
    fn held_refresh_is_scheduled_once_on_start() {
        let mut sampler = WaveformSampler::default();
        let now = Instant::now();
        sampler.request_refresh(None, now);
        sampler.request_refresh(None, now);
        sampler.on_start(SessionId(1), now);
        assert_eq!(sampler.pending_count(), 1);
        assert!(!sampler.needs_update());

        sampler.on_start(SessionId(2), now);
        assert_eq!(sampler.pending_count(), 1);
    }

    #[test]
    fn pull_outliving_its_session_still_fires_by_default() {
        let mut graph = OfflineGraph::default();
        let mut sampler = WaveformSampler::default();
        let now = Instant::now();
        sampler.request_refresh(Some(SessionId(1)), now);
        assert!(sampler.poll(now + DEFAULT_REFRESH_DELAY, None, &mut graph));
    }

    #[test]
    fn cancel_on_stop_drops_stale_pulls() {
        let mut graph = OfflineGraph::default();
        let mut sampler = WaveformSampler::new(DEFAULT_REFRESH_DELAY, true);
        let now = Instant::now();
        sampler.request_refresh(Some(SessionId(1)), now);
        assert!(!sampler.poll(now + DEFAULT_REFRESH_DELAY, None, &mut graph));
        assert_eq!(sampler.pending_count(), 0);
    }

    #[test]
    fn buffer_has_fft_size() {
        assert_eq!(WaveformSampler::default().buffer().len(), FFT_SIZE);
    }
}
