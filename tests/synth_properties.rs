//! Synth behaviour end to end over an offline graph: presets, the playback
//! state machine, deferred chart refresh and edit bookkeeping.

use std::f32::consts::PI;
use std::time::{Duration, Instant};

use assert_approx_eq::assert_approx_eq;

use harmonics::audio::OfflineGraph;
use harmonics::synth::{
    notification_channel, CoefficientKind, Notification, NotificationReceiver, PlayState, Synth,
    SynthError, SynthSettings, UiEvent, CUSTOM, DEFAULT_REFRESH_DELAY, HARMONIC_COUNT,
};

fn synth() -> (Synth<OfflineGraph>, NotificationReceiver) {
    let (tx, rx) = notification_channel();
    let synth = Synth::new(OfflineGraph::default(), tx, SynthSettings::default()).unwrap();
    (synth, rx)
}

fn count_updates(notes: &[Notification]) -> usize {
    notes
        .iter()
        .filter(|n| **n == Notification::SampleBufferUpdated)
        .count()
}

// =============================================================================
// Coefficient table
// =============================================================================

#[test]
fn set_coefficient_reads_back_exactly() {
    let (mut synth, _rx) = synth();
    let now = Instant::now();
    for i in 1..HARMONIC_COUNT {
        for step in 0..=8 {
            let v = -2.0 + 0.5 * step as f32;
            let before = synth.table().clone();
            synth
                .handle(
                    UiEvent::SetCoefficient {
                        kind: CoefficientKind::Cosine,
                        index: i,
                        value: v,
                    },
                    now,
                )
                .unwrap();
            assert_eq!(synth.table().coefficient(CoefficientKind::Cosine, i), v);
            for j in (0..HARMONIC_COUNT).filter(|&j| j != i) {
                assert_eq!(
                    synth.table().coefficient(CoefficientKind::Cosine, j),
                    before.coefficient(CoefficientKind::Cosine, j)
                );
            }
            assert_eq!(synth.table().sine(), before.sine());
        }
    }
}

// =============================================================================
// Presets
// =============================================================================

#[test]
fn sine_preset_is_a_single_partial() {
    let (mut synth, _rx) = synth();
    synth
        .handle(UiEvent::SelectWave("sine".into()), Instant::now())
        .unwrap();
    let table = synth.table();
    assert_eq!(table.sine()[1], 1.0);
    assert_eq!(table.cosine()[1], 0.0);
    for n in 2..HARMONIC_COUNT {
        assert_eq!(table.sine()[n], 0.0);
        assert_eq!(table.cosine()[n], 0.0);
    }
}

#[test]
fn square_preset_fundamental() {
    let (mut synth, _rx) = synth();
    synth
        .handle(UiEvent::SelectWave("square".into()), Instant::now())
        .unwrap();
    assert_approx_eq!(synth.table().sine()[1], 4.0 / PI, 1e-6);
    assert!(synth.table().cosine().iter().all(|&c| c == 0.0));
}

#[test]
fn preset_leaves_dc_term_alone() {
    let (mut synth, _rx) = synth();
    let now = Instant::now();
    synth
        .handle(
            UiEvent::SetCoefficient {
                kind: CoefficientKind::Sine,
                index: 0,
                value: 0.3,
            },
            now,
        )
        .unwrap();
    synth.handle(UiEvent::SelectWave("saw".into()), now).unwrap();
    assert_eq!(synth.table().sine()[0], 0.3);
}

// =============================================================================
// Playback state machine
// =============================================================================

#[test]
fn toggle_moves_between_states() {
    let (mut synth, _rx) = synth();
    let now = Instant::now();
    assert_eq!(synth.play_state(), PlayState::Stopped);
    synth.handle(UiEvent::TogglePlayback, now).unwrap();
    assert_eq!(synth.play_state(), PlayState::Playing);
    synth.handle(UiEvent::TogglePlayback, now).unwrap();
    assert_eq!(synth.play_state(), PlayState::Stopped);
    assert_eq!(synth.graph().live_oscillators(), 0);
}

#[test]
fn edits_while_stopped_create_no_oscillators() {
    let (mut synth, _rx) = synth();
    let now = Instant::now();
    synth.handle(UiEvent::SelectWave("triangle".into()), now).unwrap();
    synth
        .handle(
            UiEvent::SetCoefficient {
                kind: CoefficientKind::Sine,
                index: 2,
                value: 0.5,
            },
            now,
        )
        .unwrap();
    assert_eq!(synth.graph().oscillators_created(), 0);
    assert_eq!(synth.play_state(), PlayState::Stopped);
}

#[test]
fn every_edit_while_playing_uses_a_fresh_oscillator() {
    let (mut synth, _rx) = synth();
    let now = Instant::now();
    synth.handle(UiEvent::TogglePlayback, now).unwrap();
    for i in 1..4 {
        synth
            .handle(
                UiEvent::SetCoefficient {
                    kind: CoefficientKind::Sine,
                    index: i,
                    value: 1.0 / i as f32,
                },
                now,
            )
            .unwrap();
    }
    assert_eq!(synth.graph().oscillators_created(), 4);
    assert_eq!(synth.graph().live_oscillators(), 1);
    assert_eq!(synth.graph().audible_oscillators(), 1);
}

#[test]
fn restart_without_edits_keeps_snapshot() {
    let (mut synth, _rx) = synth();
    let now = Instant::now();
    synth.handle(UiEvent::SelectWave("saw".into()), now).unwrap();
    synth.handle(UiEvent::TogglePlayback, now).unwrap();
    let first = synth.controller().snapshot().cloned();
    // Re-selecting the same wave rebuilds the oscillator with identical input.
    synth.handle(UiEvent::SelectWave("saw".into()), now).unwrap();
    synth.handle(UiEvent::SelectWave("saw".into()), now).unwrap();
    assert_eq!(synth.controller().snapshot().cloned(), first);
}

#[test]
fn restart_does_not_announce_playback_change() {
    let (mut synth, rx) = synth();
    let now = Instant::now();
    synth.handle(UiEvent::TogglePlayback, now).unwrap();
    rx.drain();
    synth.handle(UiEvent::SelectWave("square".into()), now).unwrap();
    assert!(!rx
        .drain()
        .iter()
        .any(|n| matches!(n, Notification::PlaybackStateChanged(_))));
}

// =============================================================================
// Deferred chart refresh
// =============================================================================

#[test]
fn refresh_while_stopped_is_held_until_start() {
    let (mut synth, rx) = synth();
    let t0 = Instant::now();
    synth.handle(UiEvent::SelectWave("square".into()), t0).unwrap();
    synth.handle(UiEvent::SelectWave("saw".into()), t0).unwrap();
    assert!(synth.sampler().needs_update());

    synth.poll(t0 + Duration::from_secs(5));
    assert_eq!(count_updates(&rx.drain()), 0);
    assert!(synth.samples().iter().all(|&s| s == 0.0));

    let t1 = t0 + Duration::from_secs(10);
    synth.handle(UiEvent::TogglePlayback, t1).unwrap();
    assert!(!synth.sampler().needs_update());
    synth.poll(t1 + DEFAULT_REFRESH_DELAY / 2);
    assert_eq!(count_updates(&rx.drain()), 0);
    synth.poll(t1 + DEFAULT_REFRESH_DELAY);
    assert_eq!(count_updates(&rx.drain()), 1);
    synth.poll(t1 + DEFAULT_REFRESH_DELAY * 10);
    assert_eq!(count_updates(&rx.drain()), 0);
    assert!(synth.samples().iter().any(|&s| s != 0.0));
}

#[test]
fn start_without_pending_refresh_schedules_nothing() {
    let (mut synth, _rx) = synth();
    let now = Instant::now();
    synth.handle(UiEvent::TogglePlayback, now).unwrap();
    assert_eq!(synth.sampler().pending_count(), 0);
}

#[test]
fn pull_scheduled_before_stop_still_fires() {
    let (mut synth, rx) = synth();
    let now = Instant::now();
    synth.handle(UiEvent::TogglePlayback, now).unwrap();
    synth.handle(UiEvent::SelectWave("sine".into()), now).unwrap();
    synth.handle(UiEvent::TogglePlayback, now).unwrap();
    rx.drain();
    synth.poll(now + DEFAULT_REFRESH_DELAY);
    assert_eq!(count_updates(&rx.drain()), 1);
}

#[test]
fn cancel_on_stop_drops_the_pull() {
    let (tx, rx) = notification_channel();
    let settings = SynthSettings {
        cancel_on_stop: true,
        ..SynthSettings::default()
    };
    let mut synth = Synth::new(OfflineGraph::default(), tx, settings).unwrap();
    let now = Instant::now();
    synth.handle(UiEvent::TogglePlayback, now).unwrap();
    synth.handle(UiEvent::SelectWave("sine".into()), now).unwrap();
    synth.handle(UiEvent::TogglePlayback, now).unwrap();
    rx.drain();
    synth.poll(now + DEFAULT_REFRESH_DELAY);
    assert_eq!(count_updates(&rx.drain()), 0);
}

#[test]
fn trace_reflects_amplitude_and_gain() {
    let (tx, _rx) = notification_channel();
    let settings = SynthSettings {
        gain: 0.8,
        ..SynthSettings::default()
    };
    let mut synth = Synth::new(OfflineGraph::default(), tx, settings).unwrap();
    let now = Instant::now();
    synth
        .handle(
            UiEvent::SetCoefficient {
                kind: CoefficientKind::Sine,
                index: 1,
                value: 0.5,
            },
            now,
        )
        .unwrap();
    synth.handle(UiEvent::TogglePlayback, now).unwrap();
    synth.poll(now + DEFAULT_REFRESH_DELAY);
    let peak = synth.samples().iter().fold(0.0f32, |m, &s| m.max(s.abs()));
    assert_approx_eq!(peak, 0.4, 0.01);
}

#[test]
fn full_gain_trace_is_not_limited() {
    let (tx, _rx) = notification_channel();
    let settings = SynthSettings {
        gain: 1.0,
        ..SynthSettings::default()
    };
    let mut synth = Synth::new(OfflineGraph::default(), tx, settings).unwrap();
    let now = Instant::now();
    synth.handle(UiEvent::SelectWave("sine".into()), now).unwrap();
    synth.handle(UiEvent::TogglePlayback, now).unwrap();
    synth.poll(now + DEFAULT_REFRESH_DELAY);
    let peak = synth.samples().iter().fold(0.0f32, |m, &s| m.max(s.abs()));
    assert_approx_eq!(peak, 1.0, 0.01);
}

#[test]
fn gain_change_while_playing_redraws_chart() {
    let (mut synth, rx) = synth();
    let now = Instant::now();
    synth.handle(UiEvent::SelectWave("sine".into()), now).unwrap();
    synth.handle(UiEvent::TogglePlayback, now).unwrap();
    synth.poll(now + DEFAULT_REFRESH_DELAY);
    rx.drain();

    let t1 = now + DEFAULT_REFRESH_DELAY;
    synth.handle(UiEvent::SetGain(0.25), t1).unwrap();
    assert_eq!(synth.sampler().pending_count(), 1);
    synth.poll(t1 + DEFAULT_REFRESH_DELAY);
    assert_eq!(count_updates(&rx.drain()), 1);
    let peak = synth.samples().iter().fold(0.0f32, |m, &s| m.max(s.abs()));
    assert_approx_eq!(peak, 0.25, 0.01);
}

#[test]
fn gain_change_while_stopped_is_held_until_start() {
    let (mut synth, rx) = synth();
    let now = Instant::now();
    synth.handle(UiEvent::SetGain(0.25), now).unwrap();
    assert!(synth.sampler().needs_update());
    assert_eq!(synth.sampler().pending_count(), 0);

    synth.handle(UiEvent::TogglePlayback, now).unwrap();
    assert_eq!(synth.sampler().pending_count(), 1);
    rx.drain();
    synth.poll(now + DEFAULT_REFRESH_DELAY);
    assert_eq!(count_updates(&rx.drain()), 1);
}

// =============================================================================
// Selection and formula text bookkeeping
// =============================================================================

#[test]
fn raw_edit_always_selects_custom() {
    let (mut synth, _rx) = synth();
    let now = Instant::now();
    for preset in ["sine", "triangle", "square", "saw"] {
        synth.handle(UiEvent::SelectWave(preset.into()), now).unwrap();
        assert_eq!(synth.selection(), preset);
        synth
            .handle(
                UiEvent::ResetCoefficient {
                    kind: CoefficientKind::Cosine,
                    index: 5,
                },
                now,
            )
            .unwrap();
        assert_eq!(synth.selection(), CUSTOM);
    }
}

#[test]
fn slider_clears_text_but_not_custom_entry() {
    let (mut synth, _rx) = synth();
    let now = Instant::now();
    synth
        .handle(
            UiEvent::FormulaInput {
                kind: CoefficientKind::Sine,
                text: "1 / n^2".into(),
            },
            now,
        )
        .unwrap();
    synth
        .handle(
            UiEvent::SetCoefficient {
                kind: CoefficientKind::Sine,
                index: 1,
                value: 0.0,
            },
            now,
        )
        .unwrap();
    assert_eq!(synth.formula_text(CoefficientKind::Sine), "");
    assert_eq!(synth.bank().custom().sine, "1 / n^2");
}

#[test]
fn formula_round_trip_matches_closed_form() {
    let (mut synth, _rx) = synth();
    synth
        .handle(
            UiEvent::FormulaInput {
                kind: CoefficientKind::Sine,
                text: "8 * sin(pi * n / 2) / (n * pi)^2".into(),
            },
            Instant::now(),
        )
        .unwrap();
    for n in 1..HARMONIC_COUNT {
        let nf = n as f64;
        let expected = 8.0 * (std::f64::consts::PI * nf / 2.0).sin()
            / (nf * std::f64::consts::PI).powi(2);
        assert_approx_eq!(synth.table().sine()[n] as f64, expected, 1e-6);
    }
}

#[test]
fn compile_error_changes_nothing() {
    let (mut synth, rx) = synth();
    let now = Instant::now();
    synth.handle(UiEvent::SelectWave("triangle".into()), now).unwrap();
    let table = synth.table().clone();
    let text = synth.formula_text(CoefficientKind::Cosine).to_string();
    rx.drain();

    let err = synth
        .handle(
            UiEvent::FormulaInput {
                kind: CoefficientKind::Cosine,
                text: "n +* 2".into(),
            },
            now,
        )
        .unwrap_err();
    assert!(matches!(err, SynthError::Compile { .. }));
    assert_eq!(synth.table(), &table);
    assert_eq!(synth.selection(), "triangle");
    assert_eq!(synth.formula_text(CoefficientKind::Cosine), text);
    assert!(matches!(
        rx.drain().as_slice(),
        [Notification::FormulaRejected {
            kind: CoefficientKind::Cosine,
            ..
        }]
    ));
}

#[test]
fn empty_formula_is_rejected() {
    let (mut synth, _rx) = synth();
    let result = synth.handle(
        UiEvent::FormulaInput {
            kind: CoefficientKind::Sine,
            text: "   ".into(),
        },
        Instant::now(),
    );
    assert!(result.is_err());
    assert!(synth.table().sine().iter().all(|&v| v == 0.0));
}

#[test]
fn non_finite_results_are_stored() {
    let (mut synth, _rx) = synth();
    synth
        .handle(
            UiEvent::FormulaInput {
                kind: CoefficientKind::Cosine,
                text: "1 / (n - 1)".into(),
            },
            Instant::now(),
        )
        .unwrap();
    assert!(synth.table().cosine()[1].is_infinite());
    assert_eq!(synth.table().cosine()[2], 1.0);
}

#[test]
fn custom_selection_restores_last_formulas() {
    let (mut synth, _rx) = synth();
    let now = Instant::now();
    synth
        .handle(
            UiEvent::FormulaInput {
                kind: CoefficientKind::Cosine,
                text: "0".into(),
            },
            now,
        )
        .unwrap();
    synth
        .handle(
            UiEvent::FormulaInput {
                kind: CoefficientKind::Sine,
                text: "1 / n".into(),
            },
            now,
        )
        .unwrap();
    synth.handle(UiEvent::SelectWave("square".into()), now).unwrap();
    synth.handle(UiEvent::SelectWave(CUSTOM.into()), now).unwrap();
    assert_eq!(synth.selection(), CUSTOM);
    assert_approx_eq!(synth.table().sine()[2], 0.5);
    assert_eq!(synth.formula_text(CoefficientKind::Sine), "1 / n");
}
