use crate::{
    CoreResult, VoiceNoteError,
    capability::{AudioMode, AudioSession, FileStore, Player},
    config::{PlayerSettle, ResumePolicy, SessionConfig, settle},
    playback::{
        PlaybackPhase, PlaybackState, ProgressSample, ProgressTracker, TrackerEvent,
        TrackerEvents,
    },
    recording::{Recording, RecordingStore},
};

use std::{panic::Location, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Owns the play / pause / switch state machine over stored recordings.
///
/// Only one recording is ever loaded. Switching targets tears the previous
/// session down completely before the new file is verified.
pub struct PlaybackController {
    player: Box<dyn Player>,
    files: Arc<dyn FileStore>,
    audio_session: Arc<dyn AudioSession>,
    tracker: ProgressTracker,
    player_settle: PlayerSettle,
    resume: ResumePolicy,
    phase: PlaybackPhase,
}

impl PlaybackController {
    /// Create a controller and the receiver for its tracker events.
    pub fn new(
        player: Box<dyn Player>,
        files: Arc<dyn FileStore>,
        audio_session: Arc<dyn AudioSession>,
        config: &SessionConfig,
    ) -> (Self, TrackerEvents) {
        let (tracker, events) = ProgressTracker::new(config.progress_interval);

        let controller = Self {
            player,
            files,
            audio_session,
            tracker,
            player_settle: config.player_settle,
            resume: config.resume,
            phase: PlaybackPhase::Idle,
        };

        (controller, events)
    }

    /// Current phase of the state machine.
    pub fn phase(&self) -> &PlaybackPhase {
        &self.phase
    }

    /// Snapshot of the observable playback state.
    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            currently_playing_uri: self.phase.uri().map(str::to_string),
            is_playing: self.phase.is_playing(),
            progress_percent: self.tracker.percent(),
        }
    }

    /// Whether `uri` is the loaded recording.
    pub fn is_current(&self, uri: &str) -> bool {
        self.phase.uri() == Some(uri)
    }

    /// Whether the progress timer is alive.
    pub fn is_tracking(&self) -> bool {
        self.tracker.is_running()
    }

    /// Progress of `uri` if it is the recording playing now, otherwise zero.
    pub fn progress_for(&self, uri: &str) -> f64 {
        match &self.phase {
            PlaybackPhase::Playing { uri: current, .. } if current == uri => self.tracker.percent(),
            _ => 0.0,
        }
    }

    /// Observe progress updates.
    pub fn subscribe_progress(&self) -> watch::Receiver<ProgressSample> {
        self.tracker.subscribe()
    }

    /// Play, pause, resume or switch to `uri`.
    ///
    /// # Errors
    ///
    /// [`VoiceNoteError::PlaybackFileNotFound`] if `uri` is not in `store`,
    /// plus any error from [`PlaybackController::play`].
    #[instrument(skip(self, store))]
    pub async fn toggle(&mut self, uri: &str, store: &RecordingStore) -> CoreResult<()> {
        let Some(recording) = store.get(uri) else {
            return Err(VoiceNoteError::PlaybackFileNotFound {
                uri: uri.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let same = self.is_current(uri);
        if same && self.phase.is_playing() {
            self.pause().await
        } else if same {
            self.resume(recording).await
        } else {
            debug!(uri = %uri, "Switching recording");
            self.play(recording).await
        }
    }

    /// Tear down any session and start `recording` from the beginning.
    ///
    /// # Errors
    ///
    /// [`VoiceNoteError::PlaybackFileNotFound`] / [`VoiceNoteError::PlaybackFileEmpty`]
    /// when verification fails, [`VoiceNoteError::PlaybackFailed`] when the
    /// player fails. The controller is `Idle` after any error.
    #[instrument(skip(self, recording), fields(uri = %recording.uri()))]
    pub async fn play(&mut self, recording: &Recording) -> CoreResult<()> {
        self.stop().await?;
        self.verify(recording.uri()).await?;

        if let Err(e) = self.load_and_play(recording.uri()).await {
            self.force_idle();
            return Err(VoiceNoteError::PlaybackFailed {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let session_id = Uuid::new_v4();
        self.phase = PlaybackPhase::Playing {
            uri: recording.uri().to_string(),
            session_id,
        };
        self.tracker.start(
            session_id,
            Duration::from_millis(recording.duration_ms()),
            Duration::ZERO,
        );

        info!(session_id = %session_id, "Playback started");

        Ok(())
    }

    async fn verify(&self, uri: &str) -> CoreResult<()> {
        if !self.files.exists(uri).await {
            return Err(VoiceNoteError::PlaybackFileNotFound {
                uri: uri.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        match self.files.size(uri).await {
            Ok(0) => Err(VoiceNoteError::PlaybackFileEmpty {
                uri: uri.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
            Ok(size) => {
                debug!(uri = %uri, size, "Playback file verified");
                Ok(())
            }
            Err(e) => {
                warn!(uri = %uri, error = %e, "Playback file unreadable");
                Err(VoiceNoteError::PlaybackFileNotFound {
                    uri: uri.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
        }
    }

    async fn load_and_play(&mut self, uri: &str) -> CoreResult<()> {
        self.audio_session.set_audio_mode(AudioMode::PLAYBACK).await?;

        self.player.pause().await?;
        settle(self.player_settle.after_reset).await;

        self.player.replace(uri).await?;
        settle(self.player_settle.after_load).await;

        self.player.play().await
    }

    /// Pause the playing recording. No-op unless something is playing.
    #[instrument(skip(self))]
    pub async fn pause(&mut self) -> CoreResult<()> {
        let PlaybackPhase::Playing { uri, session_id } = &self.phase else {
            return Ok(());
        };
        let (uri, session_id) = (uri.clone(), *session_id);

        if let Err(e) = self.player.pause().await {
            self.force_idle();
            return Err(VoiceNoteError::PlaybackFailed {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let elapsed = self.tracker.stop();
        self.phase = PlaybackPhase::Paused {
            uri,
            session_id,
            elapsed,
        };

        info!(session_id = %session_id, elapsed_ms = elapsed.as_millis(), "Playback paused");

        Ok(())
    }

    async fn resume(&mut self, recording: &Recording) -> CoreResult<()> {
        let PlaybackPhase::Paused { elapsed, .. } = self.phase else {
            return Ok(());
        };

        if let Err(e) = self.player.play().await {
            self.force_idle();
            return Err(VoiceNoteError::PlaybackFailed {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let offset = match self.resume {
            ResumePolicy::RestartFromZero => Duration::ZERO,
            ResumePolicy::ContinueFromOffset => elapsed,
        };

        // Fresh id: a completion queued before the pause must not stop this run.
        let session_id = Uuid::new_v4();
        self.phase = PlaybackPhase::Playing {
            uri: recording.uri().to_string(),
            session_id,
        };
        self.tracker.start(
            session_id,
            Duration::from_millis(recording.duration_ms()),
            offset,
        );

        info!(session_id = %session_id, offset_ms = offset.as_millis(), "Playback resumed");

        Ok(())
    }

    /// Stop playback and clear the loaded recording.
    ///
    /// The state is `Idle` afterwards even when the player reports an error.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> CoreResult<()> {
        if matches!(self.phase, PlaybackPhase::Idle) {
            self.tracker.stop();
            return Ok(());
        }

        let paused = self.player.pause().await;
        self.force_idle();

        paused.map_err(|e| VoiceNoteError::PlaybackFailed {
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!("Playback stopped");

        Ok(())
    }

    /// React to an event from this controller's tracker.
    ///
    /// Completion of the current session stops playback; events from older
    /// sessions are ignored.
    #[instrument(skip(self))]
    pub async fn handle_tracker_event(&mut self, event: TrackerEvent) -> CoreResult<()> {
        match event {
            TrackerEvent::Completed { session_id } => {
                if self.phase.session_id() != Some(session_id) {
                    debug!(session_id = %session_id, "Ignoring completion of stale session");
                    return Ok(());
                }
                self.stop().await
            }
        }
    }

    /// Cancel the timer and release the player.
    pub async fn shutdown(&mut self) {
        if let Err(e) = self.stop().await {
            warn!(error = %e, "Player did not stop cleanly during shutdown");
        }
    }

    fn force_idle(&mut self) {
        self.tracker.stop();
        self.phase = PlaybackPhase::Idle;
    }
}
