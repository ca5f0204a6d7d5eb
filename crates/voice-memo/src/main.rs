//! Voice Memo: record, list, play and delete voice notes from the console.

mod app;
mod app_command;
mod config;
mod error;
mod host;
mod input_handler;
mod logging;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    input_handler::InputHandler,
};

use crate::{
    config::Config,
    host::{
        ConsoleConfirm, ConsoleLines, CpalPlayer, CpalRecorder, DevicePermission, FsFileStore,
        HostAudioSession,
    },
};

use voice_memo_core::{Capabilities, TrackerEvents, VoiceNoteManager};

use std::{sync::Arc, time::Duration};

use tokio::sync::{Mutex, mpsc, watch};
use tracing::{error, info};

/// Application entry point.
fn main() {
    let log_guard = match logging::init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            eprintln!("{}", e.alert_text());
            std::process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    let code = runtime.block_on(run(config));

    // The console reader may still be blocked in a read; do not wait for it.
    runtime.shutdown_timeout(Duration::from_secs(1));

    info!(code, "Voice Memo exiting");
    drop(log_guard);
    std::process::exit(code);
}

async fn run(config: Config) -> i32 {
    let (line_tx, line_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let lines = Arc::new(Mutex::new(line_rx));

    let (manager, tracker_events) = match build_manager(&config, Arc::clone(&lines)) {
        Ok(pair) => pair,
        Err(e) => {
            error!(error = ?e, "Failed to open audio devices");
            eprintln!("Error: {}", e.alert_text());
            return 1;
        }
    };

    let input_handler = InputHandler::new(line_tx);
    let app = App {
        manager,
        tracker_events,
        lines,
        shutdown_tx,
    };

    let (input, app) = tokio::join!(input_handler.run(shutdown_rx), app.run());

    if let Err(e) = input {
        error!(error = ?e, "Input handler error");
    }
    match app {
        Ok(()) => 0,
        Err(e) => {
            error!(error = ?e, "App error");
            1
        }
    }
}

fn build_manager(
    config: &Config,
    lines: ConsoleLines,
) -> AppResult<(VoiceNoteManager, TrackerEvents)> {
    let recordings_dir = config.recordings_dir()?;
    let cache_dir = config.cache_dir()?;

    let capabilities = Capabilities {
        recorder: Box::new(CpalRecorder::new(config.recorder_config(), &cache_dir)?),
        player: Box::new(CpalPlayer::new()?),
        files: Arc::new(FsFileStore::new(recordings_dir.clone())),
        audio_session: Arc::new(HostAudioSession::new()),
        permission: Box::new(DevicePermission),
        confirm: Box::new(ConsoleConfirm::new(lines)),
    };

    info!(
        recordings_dir = ?recordings_dir,
        cache_dir = ?cache_dir,
        "Capabilities ready"
    );

    Ok(VoiceNoteManager::new(capabilities, config.session_config()))
}
