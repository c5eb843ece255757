//! Harmonics — terminal front-end.
//!
//! Loads the config, opens the audio device (falling back to an offline
//! graph), applies the startup wave and runs the TUI until quit.

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;

use harmonics::audio::offline::OFFLINE_SAMPLE_RATE;
use harmonics::audio::{AudioEngine, AudioGraph, OfflineGraph};
use harmonics::cli::Args;
use harmonics::config::{load_config, save_config, HarmonicsConfig};
use harmonics::synth::{notification_channel, Synth, UiEvent};
use harmonics::tui::App;

/// Open the output device, or an offline graph when there is none.
fn open_graph(config: &HarmonicsConfig, no_audio: bool) -> Box<dyn AudioGraph> {
    let offline = || {
        Box::new(OfflineGraph::new(
            config.sample_rate.unwrap_or(OFFLINE_SAMPLE_RATE),
            config.frequency_hz,
        )) as Box<dyn AudioGraph>
    };
    if no_audio {
        return offline();
    }

    let engine = match config.sample_rate {
        Some(rate) => AudioEngine::with_sample_rate(rate, config.frequency_hz),
        None => AudioEngine::new(config.frequency_hz),
    };
    match engine {
        Ok(engine) => Box::new(engine),
        Err(e) => {
            eprintln!("audio unavailable ({e}), running without sound");
            offline()
        }
    }
}

fn main() {
    let args = Args::parse();
    let config_path = args.config_path();

    let mut config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load {}: {e}", config_path.display());
            process::exit(1);
        }
    };
    args.apply(&mut config);

    if args.write_config {
        if let Err(e) = save_config(&config_path, &config) {
            eprintln!("failed to write {}: {e}", config_path.display());
            process::exit(1);
        }
        println!("wrote {}", config_path.display());
        return;
    }

    let graph = open_graph(&config, args.no_audio);
    let (tx, rx) = notification_channel();
    let mut synth = match Synth::new(graph, tx, config.synth_settings()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to start synth: {e}");
            process::exit(1);
        }
    };
    if let Err(e) = synth.handle(UiEvent::SelectWave(config.initial_wave.clone()), Instant::now()) {
        eprintln!("failed to load wave '{}': {e}", config.initial_wave);
    }

    let quit = Arc::new(AtomicBool::new(false));
    let handler_flag = quit.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed)) {
        eprintln!("failed to install Ctrl-C handler: {e}");
    }

    let mut app = App::new(synth, rx).with_quit_flag(quit);
    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    if let Err(e) = result {
        eprintln!("terminal error: {e}");
        process::exit(1);
    }
}
