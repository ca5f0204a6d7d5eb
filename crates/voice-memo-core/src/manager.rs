use crate::{
    CoreResult, VoiceNoteError,
    capability::{
        AudioSession, ConfirmDialog, FileStore, PermissionProvider, Player, Recorder,
        RecorderState,
    },
    config::SessionConfig,
    playback::{PlaybackController, PlaybackState, ProgressSample, TrackerEvent, TrackerEvents},
    recording::{Recording, RecordingController, RecordingPhase, RecordingStore},
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Host capabilities needed by a [`VoiceNoteManager`].
pub struct Capabilities {
    /// Hardware recorder.
    pub recorder: Box<dyn Recorder>,
    /// Hardware player.
    pub player: Box<dyn Player>,
    /// Filesystem access.
    pub files: Arc<dyn FileStore>,
    /// Platform audio session.
    pub audio_session: Arc<dyn AudioSession>,
    /// Microphone permission prompt.
    pub permission: Box<dyn PermissionProvider>,
    /// Confirmation prompt used by delete.
    pub confirm: Box<dyn ConfirmDialog>,
}

/// Result of [`VoiceNoteManager::delete_recording`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user confirmed; file and entry are gone.
    Deleted(Recording),
    /// The user declined; nothing was removed.
    Cancelled,
}

/// Coordinates recording, playback and the recording store.
///
/// Only one audio resource is active at a time: starting a recording stops
/// playback first. Every operation takes `&mut self`, so operations never
/// interleave.
///
/// # Tracker events
///
/// The receiver returned from [`VoiceNoteManager::new`] yields completion
/// events from the progress timer. Feed each one back through
/// [`VoiceNoteManager::handle_tracker_event`] so finished clips return to idle.
pub struct VoiceNoteManager {
    store: RecordingStore,
    recording: RecordingController,
    playback: PlaybackController,
    files: Arc<dyn FileStore>,
    permission: Box<dyn PermissionProvider>,
    confirm: Box<dyn ConfirmDialog>,
    permission_granted: bool,
}

impl VoiceNoteManager {
    /// Create a manager from host capabilities.
    pub fn new(capabilities: Capabilities, config: SessionConfig) -> (Self, TrackerEvents) {
        let Capabilities {
            recorder,
            player,
            files,
            audio_session,
            permission,
            confirm,
        } = capabilities;

        let recording = RecordingController::new(
            recorder,
            Arc::clone(&files),
            Arc::clone(&audio_session),
            &config,
        );
        let (playback, events) =
            PlaybackController::new(player, Arc::clone(&files), audio_session, &config);

        info!(extension = %config.extension, "VoiceNoteManager initialized");

        let manager = Self {
            store: RecordingStore::new(),
            recording,
            playback,
            files,
            permission,
            confirm,
            permission_granted: false,
        };

        (manager, events)
    }

    /// Stop any playback, then start a new recording.
    ///
    /// Permission is requested until it has been granted once.
    ///
    /// # Errors
    ///
    /// [`VoiceNoteError::PermissionDenied`], or any error from stopping
    /// playback or starting the recorder.
    #[instrument(skip(self))]
    pub async fn start_recording(&mut self) -> CoreResult<()> {
        if !self.permission_granted {
            if !self.permission.request_recording_permission().await {
                return Err(VoiceNoteError::PermissionDenied {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            self.permission_granted = true;
            debug!("Recording permission granted");
        }

        if self.playback.phase().uri().is_some() {
            self.playback.stop().await?;
        }

        self.recording.start().await
    }

    /// Pause recording, or stop and store it when the recorder cannot pause.
    #[instrument(skip(self))]
    pub async fn pause_recording(&mut self) -> CoreResult<Option<&Recording>> {
        match self.recording.pause().await? {
            Some(recording) => self.store_recording(recording).map(Some),
            None => Ok(None),
        }
    }

    /// Resume a paused recording.
    #[instrument(skip(self))]
    pub async fn resume_recording(&mut self) -> CoreResult<()> {
        self.recording.resume().await
    }

    /// Stop recording, persist the file and append it to the store.
    ///
    /// The store is unchanged on any failure.
    #[instrument(skip(self))]
    pub async fn stop_recording(&mut self) -> CoreResult<&Recording> {
        let recording = self.recording.stop().await?;
        self.store_recording(recording)
    }

    fn store_recording(&mut self, recording: Recording) -> CoreResult<&Recording> {
        self.store.append(recording)?;
        self.store.recordings().last().ok_or_else(|| VoiceNoteError::RecordingFailed {
            reason: "Recording vanished from store".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Play, pause, resume or switch to the recording at `uri`.
    ///
    /// Refused with [`VoiceNoteError::RecordingInProgress`] while a recording
    /// session is recording or paused; the recorder owns the audio device.
    #[instrument(skip(self))]
    pub async fn toggle_playback(&mut self, uri: &str) -> CoreResult<()> {
        if !self.recording.phase().is_idle() {
            warn!(uri = %uri, "Playback refused while recording");
            return Err(VoiceNoteError::RecordingInProgress {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.playback.toggle(uri, &self.store).await
    }

    /// Pause the playing recording.
    #[instrument(skip(self))]
    pub async fn pause_playback(&mut self) -> CoreResult<()> {
        self.playback.pause().await
    }

    /// Stop playback and clear the loaded recording.
    #[instrument(skip(self))]
    pub async fn stop_playback(&mut self) -> CoreResult<()> {
        self.playback.stop().await
    }

    /// Delete the recording at `uri` after confirmation.
    ///
    /// Playback of `uri` is stopped before asking. On acceptance the file is
    /// removed first, then the entry; if the file cannot be removed the entry
    /// is kept.
    #[instrument(skip(self))]
    pub async fn delete_recording(&mut self, uri: &str) -> CoreResult<DeleteOutcome> {
        if !self.store.contains(uri) {
            return Err(VoiceNoteError::RecordingNotFound {
                uri: uri.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.playback.is_current(uri) {
            self.playback.stop().await?;
        }

        if !self.confirm.confirm("Delete Recording", "Are you sure?").await {
            debug!(uri = %uri, "Delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        if self.files.exists(uri).await {
            self.files
                .delete(uri)
                .await
                .map_err(|e| VoiceNoteError::DeleteFailed {
                    uri: uri.to_string(),
                    reason: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        let removed = self
            .store
            .remove(uri)
            .ok_or_else(|| VoiceNoteError::RecordingNotFound {
                uri: uri.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(uri = %uri, "Recording deleted");

        Ok(DeleteOutcome::Deleted(removed))
    }

    /// Apply an event from the progress tracker.
    pub async fn handle_tracker_event(&mut self, event: TrackerEvent) -> CoreResult<()> {
        self.playback.handle_tracker_event(event).await
    }

    /// Stored recordings in recording order.
    pub fn recordings(&self) -> &[Recording] {
        self.store.recordings()
    }

    /// The recording store.
    pub fn store(&self) -> &RecordingStore {
        &self.store
    }

    /// Recording state machine phase.
    pub fn recording_phase(&self) -> RecordingPhase {
        self.recording.phase()
    }

    /// State reported by the recorder.
    pub fn recorder_state(&self) -> RecorderState {
        self.recording.recorder_state()
    }

    /// Observable playback state.
    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    /// Whether the progress timer is alive.
    pub fn is_tracking(&self) -> bool {
        self.playback.is_tracking()
    }

    /// Progress of `uri` if it is playing, otherwise zero.
    pub fn progress_for(&self, uri: &str) -> f64 {
        self.playback.progress_for(uri)
    }

    /// Observe progress updates.
    pub fn subscribe_progress(&self) -> watch::Receiver<ProgressSample> {
        self.playback.subscribe_progress()
    }

    /// Whether `uri` exists and is non-empty.
    pub async fn test_file_access(&self, uri: &str) -> bool {
        self.files.exists(uri).await && self.files.size(uri).await.is_ok_and(|size| size > 0)
    }

    /// Stop playback and cancel the progress timer.
    #[instrument(skip(self))]
    pub async fn shutdown(&mut self) {
        self.playback.shutdown().await;
        info!("VoiceNoteManager shut down");
    }
}
