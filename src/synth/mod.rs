//! Synth core — the coefficient table, formula bank, playback and sampler
//! behind one explicit state object.
//!
//! The front-end feeds [`UiEvent`]s into [`Synth::handle`] and calls
//! [`Synth::poll`] once per tick. Every state change goes back out as a
//! [`Notification`].

pub mod formula_bank;
pub mod notify;
pub mod playback;
pub mod sampler;
pub mod table;

use std::fmt;
use std::time::{Duration, Instant};

use crate::audio::{AudioError, AudioGraph};
use crate::formula::{CompileError, Evaluator, ExpressionEvaluator, HarmonicFn};

pub use formula_bank::{FormulaBank, WaveFormula, CUSTOM};
pub use notify::{notification_channel, Notification, NotificationReceiver, NotificationSender};
pub use playback::{PlayState, PlaybackController, PlaybackError, SessionId};
pub use sampler::{WaveformSampler, DEFAULT_REFRESH_DELAY};
pub use table::{CoefficientKind, HarmonicTable, HARMONIC_COUNT};

/// User edits, as delivered by the front-end.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    TogglePlayback,
    SetGain(f32),
    SelectWave(String),
    SetCoefficient {
        kind: CoefficientKind,
        index: usize,
        value: f32,
    },
    /// Zero one coefficient.
    ResetCoefficient { kind: CoefficientKind, index: usize },
    /// New text in a formula field.
    FormulaInput { kind: CoefficientKind, text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SynthError {
    Compile {
        kind: CoefficientKind,
        error: CompileError,
    },
    Playback(PlaybackError),
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthError::Compile { kind, error } => write!(f, "{kind} formula: {error}"),
            SynthError::Playback(e) => write!(f, "playback: {e}"),
        }
    }
}

impl std::error::Error for SynthError {}

impl From<PlaybackError> for SynthError {
    fn from(e: PlaybackError) -> Self {
        SynthError::Playback(e)
    }
}

/// Tunables taken from the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthSettings {
    pub gain: f32,
    pub refresh_delay: Duration,
    pub cancel_on_stop: bool,
}

impl Default for SynthSettings {
    fn default() -> Self {
        Self {
            gain: 0.5,
            refresh_delay: DEFAULT_REFRESH_DELAY,
            cancel_on_stop: false,
        }
    }
}

pub struct Synth<G: AudioGraph> {
    graph: G,
    evaluator: Box<dyn Evaluator>,
    table: HarmonicTable,
    bank: FormulaBank,
    controller: PlaybackController,
    sampler: WaveformSampler,
    selection: String,
    cosine_text: String,
    sine_text: String,
    gain: f32,
    notifier: NotificationSender,
}

impl<G: AudioGraph> Synth<G> {
    /// All coefficients zero, stopped, no refresh pending, `custom` selected.
    pub fn new(
        mut graph: G,
        notifier: NotificationSender,
        settings: SynthSettings,
    ) -> Result<Self, AudioError> {
        let gain = settings.gain.clamp(0.0, 1.0);
        graph.set_gain(gain)?;
        Ok(Self {
            graph,
            evaluator: Box::new(ExpressionEvaluator),
            table: HarmonicTable::new(),
            bank: FormulaBank::new(),
            controller: PlaybackController::new(),
            sampler: WaveformSampler::new(settings.refresh_delay, settings.cancel_on_stop),
            selection: CUSTOM.to_string(),
            cosine_text: String::new(),
            sine_text: String::new(),
            gain,
            notifier,
        })
    }

    /// Swap the formula language.
    pub fn with_evaluator(mut self, evaluator: Box<dyn Evaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn handle(&mut self, event: UiEvent, now: Instant) -> Result<(), SynthError> {
        match event {
            UiEvent::TogglePlayback => self.toggle_playback(now),
            UiEvent::SetGain(gain) => self.set_gain(gain, now),
            UiEvent::SelectWave(name) => self.select_wave(&name, now),
            UiEvent::SetCoefficient { kind, index, value } => {
                self.edit_coefficient(kind, index, value, now)
            }
            UiEvent::ResetCoefficient { kind, index } => {
                self.edit_coefficient(kind, index, 0.0, now)
            }
            UiEvent::FormulaInput { kind, text } => self.formula_input(kind, text, now),
        }
    }

    /// Per-tick work: drain the audio tap and fire due sample pulls.
    pub fn poll(&mut self, now: Instant) {
        self.graph.pump();
        let active = self.controller.session_id();
        if self.sampler.poll(now, active, &mut self.graph) {
            self.notify(Notification::SampleBufferUpdated);
        }
    }

    fn toggle_playback(&mut self, now: Instant) -> Result<(), SynthError> {
        match self.controller.state() {
            PlayState::Stopped => {
                let session = self.controller.start(&self.table, &mut self.graph)?;
                self.sampler.on_start(session, now);
                self.notify(Notification::PlaybackStateChanged(PlayState::Playing));
            }
            PlayState::Playing => {
                let result = self.controller.stop(&mut self.graph);
                self.notify(Notification::PlaybackStateChanged(PlayState::Stopped));
                result?;
            }
        }
        Ok(())
    }

    /// Gain sits before the analyser, so the trace is refreshed too.
    fn set_gain(&mut self, gain: f32, now: Instant) -> Result<(), SynthError> {
        let gain = gain.clamp(0.0, 1.0);
        self.graph
            .set_gain(gain)
            .map_err(|e| SynthError::Playback(e.into()))?;
        self.gain = gain;
        self.notify(Notification::GainChanged(gain));
        self.sampler
            .request_refresh(self.controller.session_id(), now);
        Ok(())
    }

    /// Fill the table from a named bank entry. Unknown names and entries
    /// without both formulas are ignored.
    fn select_wave(&mut self, name: &str, now: Instant) -> Result<(), SynthError> {
        let Some(formula) = self.bank.lookup(name).filter(|f| f.is_complete()) else {
            return Ok(());
        };
        let formula = formula.clone();

        let cosine = self.compile(CoefficientKind::Cosine, &formula.cosine)?;
        let sine = self.compile(CoefficientKind::Sine, &formula.sine)?;
        self.apply(CoefficientKind::Cosine, &cosine);
        self.apply(CoefficientKind::Sine, &sine);

        if self.selection != name {
            self.selection = name.to_string();
            self.notify(Notification::WaveSelectionChanged(self.selection.clone()));
        }
        self.set_text(CoefficientKind::Cosine, formula.cosine);
        self.set_text(CoefficientKind::Sine, formula.sine);
        self.notify(Notification::CoefficientsChanged);
        self.refresh(now)
    }

    fn edit_coefficient(
        &mut self,
        kind: CoefficientKind,
        index: usize,
        value: f32,
        now: Instant,
    ) -> Result<(), SynthError> {
        self.table.set_coefficient(kind, index, value);
        self.switch_to_custom();
        self.clear_text(kind);
        self.notify(Notification::CoefficientsChanged);
        self.refresh(now)
    }

    fn formula_input(
        &mut self,
        kind: CoefficientKind,
        text: String,
        now: Instant,
    ) -> Result<(), SynthError> {
        let compiled = self.compile(kind, &text)?;
        self.apply(kind, &compiled);
        self.set_text(kind, text);
        self.bank
            .set_custom(self.cosine_text.clone(), self.sine_text.clone());
        self.switch_to_custom();
        self.notify(Notification::CoefficientsChanged);
        self.refresh(now)
    }

    fn compile(&self, kind: CoefficientKind, text: &str) -> Result<HarmonicFn, SynthError> {
        self.evaluator.compile(text).map_err(|error| {
            self.notify(Notification::FormulaRejected {
                kind,
                error: error.clone(),
            });
            SynthError::Compile { kind, error }
        })
    }

    /// Evaluate at n = 1..L-1; index 0 keeps its value.
    fn apply(&mut self, kind: CoefficientKind, f: &HarmonicFn) {
        let values: Vec<f32> = (1..HARMONIC_COUNT as u32).map(|n| f(n)).collect();
        self.table.bulk_set(kind, 1, &values);
    }

    fn set_text(&mut self, kind: CoefficientKind, text: String) {
        let slot = match kind {
            CoefficientKind::Cosine => &mut self.cosine_text,
            CoefficientKind::Sine => &mut self.sine_text,
        };
        if *slot != text {
            *slot = text.clone();
            self.notify(Notification::FormulaTextChanged { kind, text });
        }
    }

    /// Always announced: the front-end may hold rejected text the synth never stored.
    fn clear_text(&mut self, kind: CoefficientKind) {
        match kind {
            CoefficientKind::Cosine => self.cosine_text.clear(),
            CoefficientKind::Sine => self.sine_text.clear(),
        }
        self.notify(Notification::FormulaTextChanged {
            kind,
            text: String::new(),
        });
    }

    /// Move the selector to `custom` after an edit that no preset produced.
    pub fn switch_to_custom(&mut self) {
        if self.selection != CUSTOM {
            self.selection = CUSTOM.to_string();
            self.notify(Notification::WaveSelectionChanged(self.selection.clone()));
        }
    }

    /// Rebuild the running oscillator and ask for a new trace.
    fn refresh(&mut self, now: Instant) -> Result<(), SynthError> {
        if let Err(e) = self.controller.restart(&self.table, &mut self.graph) {
            // A failed restart leaves the controller stopped.
            self.sampler.request_refresh(None, now);
            self.notify(Notification::PlaybackStateChanged(PlayState::Stopped));
            return Err(e.into());
        }
        self.sampler
            .request_refresh(self.controller.session_id(), now);
        Ok(())
    }

    fn notify(&self, notification: Notification) {
        // The receiver may be gone during shutdown.
        let _ = self.notifier.send(notification);
    }

    pub fn table(&self) -> &HarmonicTable {
        &self.table
    }

    pub fn bank(&self) -> &FormulaBank {
        &self.bank
    }

    /// Current selector value.
    pub fn selection(&self) -> &str {
        &self.selection
    }

    pub fn formula_text(&self, kind: CoefficientKind) -> &str {
        match kind {
            CoefficientKind::Cosine => &self.cosine_text,
            CoefficientKind::Sine => &self.sine_text,
        }
    }

    pub fn play_state(&self) -> PlayState {
        self.controller.state()
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn sampler(&self) -> &WaveformSampler {
        &self.sampler
    }

    /// Latest trace, FFT_SIZE samples.
    pub fn samples(&self) -> &[f32] {
        self.sampler.buffer()
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }
}
