//! Playback controller — the oscillator lifecycle.
//!
//! Every start builds a fresh oscillator from a snapshot of the table. Stop
//! consumes the node, so an oscillator is never started twice.

use std::fmt;

use crate::audio::{AudioError, AudioGraph, OscillatorNode, PeriodicWave, PeriodicWaveOptions};

use super::table::{HarmonicTable, TableSnapshot};

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Playing,
}

impl PlayState {
    pub fn is_playing(self) -> bool {
        self == PlayState::Playing
    }
}

impl fmt::Display for PlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayState::Stopped => f.write_str("stopped"),
            PlayState::Playing => f.write_str("playing"),
        }
    }
}

/// Identifies one start..stop span. Increases monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub u64);

/// Live state that exists only while playing.
#[derive(Debug)]
pub struct PlaybackSession {
    pub id: SessionId,
    oscillator: OscillatorNode,
    pub snapshot: TableSnapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// `start` called while a session is running.
    AlreadyPlaying,
    /// `stop` called with nothing playing.
    NotPlaying,
    /// The audio graph rejected an operation.
    Audio(AudioError),
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::AlreadyPlaying => write!(f, "already playing"),
            PlaybackError::NotPlaying => write!(f, "not playing"),
            PlaybackError::Audio(e) => write!(f, "audio error: {e}"),
        }
    }
}

impl std::error::Error for PlaybackError {}

impl From<AudioError> for PlaybackError {
    fn from(e: AudioError) -> Self {
        PlaybackError::Audio(e)
    }
}

#[derive(Debug, Default)]
pub struct PlaybackController {
    session: Option<PlaybackSession>,
    last_session: u64,
}

impl PlaybackController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlayState {
        if self.session.is_some() {
            PlayState::Playing
        } else {
            PlayState::Stopped
        }
    }

    /// Id of the running session, if any.
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Table the running oscillator was built from.
    pub fn snapshot(&self) -> Option<&TableSnapshot> {
        self.session.as_ref().map(|s| &s.snapshot)
    }

    /// Build an oscillator from the current table and start it.
    ///
    /// On a graph failure the half-built node is torn down and the
    /// controller stays stopped.
    pub fn start<G: AudioGraph + ?Sized>(
        &mut self,
        table: &HarmonicTable,
        graph: &mut G,
    ) -> Result<SessionId, PlaybackError> {
        if self.session.is_some() {
            return Err(PlaybackError::AlreadyPlaying);
        }

        let snapshot = table.snapshot();
        let wave = PeriodicWave::new(
            &snapshot.cosine,
            &snapshot.sine,
            PeriodicWaveOptions {
                disable_normalization: true,
            },
        );

        let oscillator = graph.create_oscillator(wave)?;
        if let Err(e) = graph
            .connect(&oscillator)
            .and_then(|_| graph.start(&oscillator))
        {
            let _ = graph.disconnect(oscillator);
            return Err(e.into());
        }

        self.last_session += 1;
        let id = SessionId(self.last_session);
        self.session = Some(PlaybackSession {
            id,
            oscillator,
            snapshot,
        });
        Ok(id)
    }

    /// Stop and drop the running oscillator.
    ///
    /// The controller is stopped afterwards even if the graph reported an
    /// error; the first error is returned.
    pub fn stop<G: AudioGraph + ?Sized>(&mut self, graph: &mut G) -> Result<(), PlaybackError> {
        let session = self.session.take().ok_or(PlaybackError::NotPlaying)?;
        let stopped = graph.stop(&session.oscillator);
        let disconnected = graph.disconnect(session.oscillator);
        stopped.and(disconnected).map_err(PlaybackError::from)
    }

    /// Rebuild the oscillator from the current table. No-op when stopped.
    pub fn restart<G: AudioGraph + ?Sized>(
        &mut self,
        table: &HarmonicTable,
        graph: &mut G,
    ) -> Result<Option<SessionId>, PlaybackError> {
        if self.session.is_none() {
            return Ok(None);
        }
        self.stop(graph)?;
        self.start(table, graph).map(Some)
    }
}
