//! TUI interface — ratatui panels: waveform chart, harmonic sliders, formula
//! fields, wave selector and message log.
//!
//! The App owns the synth and drives the event loop. It never mutates synth
//! state directly: keys become [`UiEvent`]s, and the panels follow the
//! [`Notification`]s that come back.

pub mod console;
pub mod harmonics;
pub mod keybindings;
pub mod layout;
pub mod status;
pub mod text_field;
pub mod theme;

pub use console::MessageLog;
pub use harmonics::HarmonicCursor;
pub use keybindings::{map_key, Action};
pub use layout::FocusPanel;
pub use status::StatusInfo;
pub use text_field::TextField;
pub use theme::Theme;

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::audio::AudioGraph;
use crate::synth::{
    CoefficientKind, Notification, NotificationReceiver, PlayState, Synth, SynthError, UiEvent,
    CUSTOM, HARMONIC_COUNT,
};

/// Input poll timeout per loop iteration.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Maximum message log entries.
const LOG_CAPACITY: usize = 50;

/// The main TUI application state.
pub struct App<G: AudioGraph> {
    synth: Synth<G>,
    notifications: NotificationReceiver,
    pub focus: FocusPanel,
    pub cursor: HarmonicCursor,
    pub cosine_field: TextField,
    pub sine_field: TextField,
    pub log: MessageLog,
    pub status: StatusInfo,
    /// Chart points, rebuilt on every published trace.
    pub trace: Vec<(f64, f64)>,
    pub should_quit: bool,
    quit_flag: Option<Arc<AtomicBool>>,
    theme: Theme,
    started: Instant,
}

impl<G: AudioGraph> App<G> {
    /// Wrap a synth. Panels start from the synth's current state.
    pub fn new(synth: Synth<G>, notifications: NotificationReceiver) -> Self {
        let status = StatusInfo {
            is_playing: synth.play_state().is_playing(),
            wave: synth.selection().to_string(),
            gain: synth.gain(),
            device_name: synth.graph().device_name().to_string(),
            audio_live: synth.graph().is_live(),
            formula_error: None,
        };
        let cosine_field = TextField::new(synth.formula_text(CoefficientKind::Cosine));
        let sine_field = TextField::new(synth.formula_text(CoefficientKind::Sine));
        let trace = trace_points(synth.samples());

        Self {
            synth,
            notifications,
            focus: FocusPanel::Harmonics,
            cursor: HarmonicCursor::default(),
            cosine_field,
            sine_field,
            log: MessageLog::new(LOG_CAPACITY),
            status,
            trace,
            should_quit: false,
            quit_flag: None,
            theme: Theme::default(),
            started: Instant::now(),
        }
    }

    /// Quit when this flag is raised, e.g. from a signal handler.
    pub fn with_quit_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.quit_flag = Some(flag);
        self
    }

    pub fn synth(&self) -> &Synth<G> {
        &self.synth
    }

    fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    fn field_mut(&mut self, kind: CoefficientKind) -> &mut TextField {
        match kind {
            CoefficientKind::Cosine => &mut self.cosine_field,
            CoefficientKind::Sine => &mut self.sine_field,
        }
    }

    /// The formula kind edited by the focused field, if any.
    fn focused_field(&self) -> Option<CoefficientKind> {
        match self.focus {
            FocusPanel::CosineFormula => Some(CoefficientKind::Cosine),
            FocusPanel::SineFormula => Some(CoefficientKind::Sine),
            _ => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if let Some(action) = map_key(key, self.focus) {
            self.handle_action(action, now);
        }
    }

    /// Process an action.
    pub fn handle_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::TogglePlayback => self.dispatch(UiEvent::TogglePlayback, now),
            Action::CycleFocus => self.focus = self.focus.next(),
            Action::Escape => {
                if self.focus.is_text_field() {
                    self.focus = FocusPanel::Harmonics;
                }
            }
            Action::AdjustGain(delta) => {
                let gain = self.synth.gain() + delta;
                self.dispatch(UiEvent::SetGain(gain), now);
            }
            Action::MoveHarmonic(delta) => self.cursor.step(delta),
            Action::SelectRow(kind) => self.cursor.select_row(kind),
            Action::NudgeCoefficient(delta) => {
                let HarmonicCursor { kind, index } = self.cursor;
                let current = self.synth.table().coefficient(kind, index);
                let base = if current.is_finite() { current } else { 0.0 };
                let value = harmonics::nudge(base, delta);
                self.dispatch(UiEvent::SetCoefficient { kind, index, value }, now);
            }
            Action::ResetCoefficient => {
                let HarmonicCursor { kind, index } = self.cursor;
                self.dispatch(UiEvent::ResetCoefficient { kind, index }, now);
            }
            Action::CycleWave(direction) => {
                if let Some(name) = self.next_wave(direction) {
                    self.dispatch(UiEvent::SelectWave(name), now);
                }
            }
            Action::FieldInsert(_)
            | Action::FieldBackspace
            | Action::FieldDelete
            | Action::FieldLeft
            | Action::FieldRight
            | Action::FieldHome
            | Action::FieldEnd => self.edit_field(action, now),
        }
    }

    fn edit_field(&mut self, action: Action, now: Instant) {
        let Some(kind) = self.focused_field() else {
            return;
        };
        let field = self.field_mut(kind);
        let changed = match action {
            Action::FieldInsert(c) => {
                field.insert_char(c);
                true
            }
            Action::FieldBackspace => field.backspace(),
            Action::FieldDelete => field.delete(),
            Action::FieldLeft => {
                field.move_left();
                false
            }
            Action::FieldRight => {
                field.move_right();
                false
            }
            Action::FieldHome => {
                field.home();
                false
            }
            Action::FieldEnd => {
                field.end();
                false
            }
            _ => false,
        };
        if changed {
            let text = field.text().to_string();
            self.dispatch(UiEvent::FormulaInput { kind, text }, now);
        }
    }

    /// Next selectable wave in `direction`, skipping an empty `custom`.
    fn next_wave(&self, direction: i32) -> Option<String> {
        let names = self.synth.bank().names();
        let len = names.len() as i64;
        let current = names
            .iter()
            .position(|n| *n == self.status.wave)
            .unwrap_or(0) as i64;
        let direction = i64::from(direction.signum());
        (1..len)
            .map(|step| names[(current + step * direction).rem_euclid(len) as usize])
            .find(|name| *name != CUSTOM || self.synth.bank().custom().is_complete())
            .map(str::to_string)
    }

    fn dispatch(&mut self, event: UiEvent, now: Instant) {
        match self.synth.handle(event, now) {
            Ok(()) => {}
            // Already reported through FormulaRejected.
            Err(SynthError::Compile { .. }) => {}
            Err(e) => {
                let ts = self.elapsed_secs();
                self.log.log(format!("error: {e}"), ts);
            }
        }
        self.process_notifications();
    }

    /// Per-tick work: fire due sample pulls and mirror the results.
    pub fn tick(&mut self, now: Instant) {
        self.synth.poll(now);
        self.process_notifications();
    }

    fn process_notifications(&mut self) {
        let ts = self.elapsed_secs();
        for notification in self.notifications.drain() {
            match notification {
                Notification::CoefficientsChanged => self.status.formula_error = None,
                Notification::WaveSelectionChanged(name) => {
                    self.log.log(format!("wave: {name}"), ts);
                    self.status.wave = name;
                }
                Notification::FormulaTextChanged { kind, text } => {
                    let field = self.field_mut(kind);
                    if field.text() != text {
                        field.set_text(&text);
                    }
                }
                Notification::PlaybackStateChanged(state) => {
                    self.status.is_playing = state == PlayState::Playing;
                    self.log.log(format!("playback {state}"), ts);
                }
                Notification::SampleBufferUpdated => {
                    self.trace = trace_points(self.synth.samples());
                }
                Notification::GainChanged(gain) => self.status.gain = gain,
                Notification::FormulaRejected { kind, error } => {
                    self.status.formula_error = Some(format!("{kind}: {}", error.message));
                    self.log.log(format!("{kind} formula rejected: {error}"), ts);
                }
            }
        }
    }

    /// Draw the UI.
    pub fn draw(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(45), // Chart
                Constraint::Length(7),      // Harmonic sliders
                Constraint::Length(3),      // Formulas + selector
                Constraint::Min(3),         // Message log
                Constraint::Length(1),      // Status bar
            ])
            .split(size);

        self.draw_chart(frame, chunks[0]);
        self.draw_harmonics(frame, chunks[1]);

        let row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(40),
                Constraint::Percentage(20),
            ])
            .split(chunks[2]);
        self.draw_formula(frame, row[0], CoefficientKind::Cosine);
        self.draw_formula(frame, row[1], CoefficientKind::Sine);
        self.draw_selector(frame, row[2]);

        self.draw_log(frame, chunks[3]);
        self.draw_status(frame, chunks[4]);
    }

    fn border_style(&self, panel: FocusPanel) -> Style {
        if self.focus == panel {
            Style::default().fg(self.theme.border_focused)
        } else {
            Style::default().fg(self.theme.border)
        }
    }

    fn draw_chart(&self, frame: &mut Frame, area: Rect) {
        let dataset = Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(self.theme.trace))
            .data(&self.trace);

        let x_max = self.trace.len().saturating_sub(1).max(1) as f64;
        let chart = Chart::new(vec![dataset])
            .block(
                Block::default()
                    .title(" Waveform ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.border)),
            )
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(self.theme.axis))
                    .bounds([0.0, x_max]),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(self.theme.axis))
                    .bounds([-1.0, 1.0])
                    .labels(["-1", "0", "1"]),
            );
        frame.render_widget(chart, area);
    }

    fn draw_harmonics(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Harmonics ")
            .borders(Borders::ALL)
            .border_style(self.border_style(FocusPanel::Harmonics));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let table = self.synth.table();
        let focused = self.focus == FocusPanel::Harmonics;
        let mut lines: Vec<Line> = CoefficientKind::ALL
            .iter()
            .map(|&kind| {
                let mut spans = vec![Span::styled(
                    format!("{:<4}", &kind.name()[..3]),
                    Style::default().fg(self.theme.dim),
                )];
                for (i, &value) in table.get(kind).iter().enumerate() {
                    let color = if value > 0.0 {
                        self.theme.positive
                    } else if value < 0.0 {
                        self.theme.negative
                    } else {
                        self.theme.zero
                    };
                    let mut style = Style::default().fg(color);
                    if focused && self.cursor.kind == kind && self.cursor.index == i {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    spans.push(Span::styled(
                        format!("{} ", harmonics::level_glyph(value)),
                        style,
                    ));
                }
                Line::from(spans)
            })
            .collect();

        let marker: String = (0..HARMONIC_COUNT)
            .map(|i| if i == self.cursor.index { "^ " } else { "  " })
            .collect();
        lines.push(Line::from(Span::styled(
            format!("    {marker}"),
            Style::default().fg(self.theme.cursor),
        )));

        let HarmonicCursor { kind, index } = self.cursor;
        let value = table.coefficient(kind, index);
        let label = format!("n={index:<2} {kind:<6} {value:+.2} ");
        let bar_width = (inner.width as usize).saturating_sub(label.chars().count() + 1);
        lines.push(Line::from(vec![
            Span::raw(label),
            Span::styled(
                harmonics::slider_bar(value, bar_width),
                Style::default().fg(self.theme.cursor),
            ),
        ]));

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn draw_formula(&mut self, frame: &mut Frame, area: Rect, kind: CoefficientKind) {
        let panel = match kind {
            CoefficientKind::Cosine => FocusPanel::CosineFormula,
            CoefficientKind::Sine => FocusPanel::SineFormula,
        };
        let border_style = self.border_style(panel);
        let inner_width = area.width.saturating_sub(2) as usize;
        let field = self.field_mut(kind);
        field.set_viewport_width(inner_width);
        let (shown, cursor_col) = field.visible();

        let block = Block::default()
            .title(format!(" {kind} "))
            .borders(Borders::ALL)
            .border_style(border_style);
        frame.render_widget(Paragraph::new(shown).block(block), area);

        if self.focus == panel {
            let x = area.x + 1 + cursor_col as u16;
            let y = area.y + 1;
            if x < area.x + area.width && y < area.y + area.height {
                frame.set_cursor_position((x, y));
            }
        }
    }

    fn draw_selector(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled("◀ ", Style::default().fg(self.theme.dim)),
            Span::styled(
                self.status.wave.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ▶", Style::default().fg(self.theme.dim)),
        ]);
        let block = Block::default()
            .title(" Wave ")
            .borders(Borders::ALL)
            .border_style(self.border_style(FocusPanel::Selector));
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn draw_log(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .log
            .entries()
            .iter()
            .rev()
            .map(|e| ListItem::new(format!("[{:6.1}s] {}", e.timestamp_secs, e.message)))
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title(" Messages ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.border)),
        );
        frame.render_widget(list, area);
    }

    fn context_hint(&self) -> &str {
        match self.focus {
            FocusPanel::Harmonics => "←→:harmonic ↑↓/PgUp/PgDn:adjust c/s:row 0:reset q:quit",
            FocusPanel::Selector => "←→:wave Space:play []:gain Tab:focus q:quit",
            FocusPanel::CosineFormula | FocusPanel::SineFormula => {
                "type a formula in n  Esc:back Tab:focus"
            }
        }
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let formula_indicator = match &self.status.formula_error {
            Some(err) => Span::styled(format!(" ERR {err} "), Style::default().fg(theme.error)),
            None => Span::styled(" OK ", Style::default().fg(theme.ok)),
        };
        let device_style = if self.status.audio_live {
            Style::default().fg(theme.ok)
        } else {
            Style::default().fg(theme.error)
        };

        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", self.status.playback_display()),
                Style::default()
                    .fg(if self.status.is_playing {
                        theme.ok
                    } else {
                        theme.error
                    })
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                " {} | gain {} ",
                self.status.wave,
                self.status.gain_display()
            )),
            formula_indicator,
            Span::styled(format!(" {} ", self.status.device_display()), device_style),
            Span::styled(
                format!(" {} ", self.context_hint()),
                Style::default().fg(theme.dim),
            ),
        ]);

        let paragraph =
            Paragraph::new(line).style(Style::default().bg(theme.status_bg).fg(theme.status_fg));
        frame.render_widget(paragraph, area);
    }

    fn quit_requested(&self) -> bool {
        self.should_quit
            || self
                .quit_flag
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Run the TUI event loop.
    pub fn run(
        &mut self,
        terminal: &mut ratatui::Terminal<impl ratatui::backend::Backend>,
    ) -> io::Result<()> {
        while !self.quit_requested() {
            terminal
                .draw(|frame| self.draw(frame))
                .map_err(|e| io::Error::other(e.to_string()))?;

            if event::poll(POLL_INTERVAL)? {
                if let CrosstermEvent::Key(key) = event::read()? {
                    self.handle_key(key, Instant::now());
                }
            }

            self.tick(Instant::now());
        }
        Ok(())
    }
}

fn trace_points(samples: &[f32]) -> Vec<(f64, f64)> {
    samples
        .iter()
        .enumerate()
        .map(|(i, &s)| (i as f64, f64::from(s)))
        .collect()
}
