//! Key bindings — maps key events to application actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::harmonics::{COARSE_STEP, FINE_STEP};
use super::layout::FocusPanel;
use crate::synth::CoefficientKind;

/// Gain change per `[` / `]` press.
pub const GAIN_STEP: f32 = 0.05;

/// Application-level actions triggered by key events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    TogglePlayback,
    CycleFocus,
    /// Leave a text field.
    Escape,
    AdjustGain(f32),
    /// Move the harmonic cursor by this many indices.
    MoveHarmonic(i32),
    /// Add this delta to the selected coefficient.
    NudgeCoefficient(f32),
    SelectRow(CoefficientKind),
    ResetCoefficient,
    /// Step the wave selector and apply the result.
    CycleWave(i32),
    FieldInsert(char),
    FieldBackspace,
    FieldDelete,
    FieldLeft,
    FieldRight,
    FieldHome,
    FieldEnd,
}

/// Map a key event to an action given the focused panel.
pub fn map_key(key: KeyEvent, focus: FocusPanel) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Tab => return Some(Action::CycleFocus),
        KeyCode::Esc => return Some(Action::Escape),
        _ => {}
    }

    if focus.is_text_field() {
        return match key.code {
            KeyCode::Char(c) => Some(Action::FieldInsert(c)),
            KeyCode::Backspace => Some(Action::FieldBackspace),
            KeyCode::Delete => Some(Action::FieldDelete),
            KeyCode::Left => Some(Action::FieldLeft),
            KeyCode::Right => Some(Action::FieldRight),
            KeyCode::Home => Some(Action::FieldHome),
            KeyCode::End => Some(Action::FieldEnd),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(' ') => return Some(Action::TogglePlayback),
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Char('[') => return Some(Action::AdjustGain(-GAIN_STEP)),
        KeyCode::Char(']') => return Some(Action::AdjustGain(GAIN_STEP)),
        _ => {}
    }

    match focus {
        FocusPanel::Harmonics => match key.code {
            KeyCode::Left => Some(Action::MoveHarmonic(-1)),
            KeyCode::Right => Some(Action::MoveHarmonic(1)),
            KeyCode::Up => Some(Action::NudgeCoefficient(FINE_STEP)),
            KeyCode::Down => Some(Action::NudgeCoefficient(-FINE_STEP)),
            KeyCode::PageUp => Some(Action::NudgeCoefficient(COARSE_STEP)),
            KeyCode::PageDown => Some(Action::NudgeCoefficient(-COARSE_STEP)),
            KeyCode::Char('c') => Some(Action::SelectRow(CoefficientKind::Cosine)),
            KeyCode::Char('s') => Some(Action::SelectRow(CoefficientKind::Sine)),
            KeyCode::Char('0') | KeyCode::Delete => Some(Action::ResetCoefficient),
            _ => None,
        },
        FocusPanel::Selector => match key.code {
            KeyCode::Left | KeyCode::Up => Some(Action::CycleWave(-1)),
            KeyCode::Right | KeyCode::Down => Some(Action::CycleWave(1)),
            _ => None,
        },
        FocusPanel::CosineFormula | FocusPanel::SineFormula => None,
    }
}
