use crate::{AppCommand, AppError, AppResult, app_command::HELP, host::ConsoleLines};

use voice_memo_core::{
    DeleteOutcome, RecordingStore, TrackerEvent, TrackerEvents, VoiceNoteManager,
    format_duration,
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tokio::sync::watch;
use tracing::{error, info, instrument};

/// Main application state.
///
/// Owns the voice note manager and serializes every operation on it: console
/// commands and tracker completion events are handled one at a time from a
/// single `select!` loop.
pub struct App {
    pub(crate) manager: VoiceNoteManager,
    pub(crate) tracker_events: TrackerEvents,
    pub(crate) lines: ConsoleLines,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Voice Memo starting");
        println!("Voice Memo. Type 'help' for commands.");

        loop {
            let lines = Arc::clone(&self.lines);

            tokio::select! {
                line = async move { lines.lock().await.recv().await } => {
                    let Some(line) = line else {
                        info!("Console input closed, shutting down");
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<AppCommand>() {
                        Ok(AppCommand::Quit) => {
                            info!("Shutdown requested");
                            break;
                        }
                        Ok(command) => {
                            if let Err(e) = self.execute(command).await {
                                alert(&e);
                            }
                        }
                        Err(e) => alert(&e),
                    }
                }

                Some(event) = self.tracker_events.recv() => {
                    self.on_tracker_event(event).await;
                }
            }
        }

        self.manager.shutdown().await;
        let _ = self.shutdown_tx.send(true);
        info!("Voice Memo shut down successfully");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn execute(&mut self, command: AppCommand) -> AppResult<()> {
        match command {
            AppCommand::Record => {
                self.manager.start_recording().await?;
                println!("Recording... ('stop' to save)");
            }
            AppCommand::Pause => match self.manager.pause_recording().await? {
                Some(recording) => println!(
                    "Recorder cannot pause; saved {} ({})",
                    recording.uri(),
                    format_duration(recording.duration_ms())
                ),
                None => println!("Recording paused"),
            },
            AppCommand::Resume => {
                self.manager.resume_recording().await?;
                println!("Recording resumed");
            }
            AppCommand::Stop => {
                let duration_ms = self.manager.stop_recording().await?.duration_ms();
                let label = RecordingStore::display_name(self.manager.recordings().len() - 1);
                println!("Saved {} ({})", label, format_duration(duration_ms));
            }
            AppCommand::Play { index } => {
                let uri = self.uri_at(index)?;
                self.manager.toggle_playback(&uri).await?;
                let state = self.manager.playback_state();
                let label = RecordingStore::display_name(index);
                if state.is_playing {
                    println!("Playing {}", label);
                } else {
                    println!("Paused {}", label);
                }
            }
            AppCommand::PausePlayback => {
                self.manager.pause_playback().await?;
                println!("Playback paused");
            }
            AppCommand::StopPlayback => {
                self.manager.stop_playback().await?;
                println!("Playback stopped");
            }
            AppCommand::Delete { index } => {
                let uri = self.uri_at(index)?;
                match self.manager.delete_recording(&uri).await? {
                    DeleteOutcome::Deleted(_) => {
                        println!("Deleted {}", RecordingStore::display_name(index))
                    }
                    DeleteOutcome::Cancelled => {
                        println!("Kept {}", RecordingStore::display_name(index))
                    }
                }
            }
            AppCommand::List => self.print_list(),
            AppCommand::Status => self.print_status(),
            AppCommand::Help => println!("{}", HELP),
            AppCommand::Quit => {}
        }

        Ok(())
    }

    async fn on_tracker_event(&mut self, event: TrackerEvent) {
        let finished = self.manager.playback_state().currently_playing_uri;

        match self.manager.handle_tracker_event(event).await {
            Ok(()) => {
                let now = self.manager.playback_state().currently_playing_uri;
                if let Some(uri) = finished.filter(|_| now.is_none()) {
                    let label = self
                        .manager
                        .store()
                        .position(&uri)
                        .map(RecordingStore::display_name)
                        .unwrap_or(uri);
                    println!("Finished playing {}", label);
                }
            }
            Err(e) => alert(&AppError::from(e)),
        }
    }

    #[track_caller]
    fn uri_at(&self, index: usize) -> AppResult<String> {
        self.manager
            .store()
            .at(index)
            .map(|recording| recording.uri().to_string())
            .ok_or_else(|| AppError::InvalidCommand {
                input: (index + 1).to_string(),
                reason: format!("No voice note #{}", index + 1),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    fn print_list(&self) {
        let recordings = self.manager.recordings();
        if recordings.is_empty() {
            println!("No voice notes yet. Type 'record' to make one.");
            return;
        }

        let playback = self.manager.playback_state();
        for (index, recording) in recordings.iter().enumerate() {
            let marker = match playback.currently_playing_uri.as_deref() {
                Some(uri) if uri == recording.uri() && playback.is_playing => format!(
                    "  [playing {:.0}%]",
                    self.manager.progress_for(recording.uri())
                ),
                Some(uri) if uri == recording.uri() => "  [paused]".to_string(),
                _ => String::new(),
            };
            println!(
                "{:>3}. {}  {}  {}{}",
                index + 1,
                RecordingStore::display_name(index),
                format_duration(recording.duration_ms()),
                recording.recorded_at().format("%Y-%m-%d %H:%M:%S"),
                marker
            );
        }
    }

    fn print_status(&self) {
        let phase = self.manager.recording_phase();
        let recorder = self.manager.recorder_state();
        let recording = if phase.is_recording() {
            format!("recording ({})", format_duration(recorder.duration_millis))
        } else if phase.is_paused() {
            format!("paused ({})", format_duration(recorder.duration_millis))
        } else {
            "idle".to_string()
        };

        let playback = self.manager.playback_state();
        let player = match playback.currently_playing_uri.as_deref() {
            None => "idle".to_string(),
            Some(uri) => {
                let label = self
                    .manager
                    .store()
                    .position(uri)
                    .map(RecordingStore::display_name)
                    .unwrap_or_else(|| uri.to_string());
                if playback.is_playing {
                    format!("playing {} ({:.0}%)", label, playback.progress_percent)
                } else {
                    format!("paused {}", label)
                }
            }
        };

        println!("Recorder: {}", recording);
        println!("Player:   {}", player);
        println!("Notes:    {}", self.manager.recordings().len());
    }
}

/// Show a failed operation on the console and in the log.
fn alert(e: &AppError) {
    error!(error = ?e, "Operation failed");
    println!("Error: {}", e.alert_text());
}
