//! Notification channel — typed state changes pushed from the synth to the UI.

use std::sync::mpsc;

use crate::formula::CompileError;

use super::playback::PlayState;
use super::table::CoefficientKind;

/// A state change the front-end should mirror.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// The coefficient table changed; re-read it.
    CoefficientsChanged,
    /// The selector now shows this wave name.
    WaveSelectionChanged(String),
    /// A formula field's text was replaced.
    FormulaTextChanged { kind: CoefficientKind, text: String },
    PlaybackStateChanged(PlayState),
    /// A fresh trace is in the sample buffer.
    SampleBufferUpdated,
    GainChanged(f32),
    /// A formula edit failed to compile; nothing was applied.
    FormulaRejected {
        kind: CoefficientKind,
        error: CompileError,
    },
}

pub type NotificationSender = mpsc::Sender<Notification>;

/// Receiver half, held by the event loop.
pub struct NotificationReceiver {
    rx: mpsc::Receiver<Notification>,
}

impl NotificationReceiver {
    /// Non-blocking poll for the next notification.
    pub fn poll(&self) -> Option<Notification> {
        self.rx.try_recv().ok()
    }

    /// Drain all pending notifications.
    pub fn drain(&self) -> Vec<Notification> {
        let mut notifications = Vec::new();
        while let Ok(n) = self.rx.try_recv() {
            notifications.push(n);
        }
        notifications
    }
}

pub fn notification_channel() -> (NotificationSender, NotificationReceiver) {
    let (tx, rx) = mpsc::channel();
    (tx, NotificationReceiver { rx })
}
