use crate::{
    CoreResult, VoiceNoteError,
    capability::{AudioMode, AudioSession, FileStore, FileWriter, Recorder, RecorderState},
    config::{ReadinessPolicy, SessionConfig, SettleDelays, settle},
    recording::{Recording, RecordingPhase, stable_file_name},
};

use std::{panic::Location, sync::Arc};

use chrono::Utc;
use error_location::ErrorLocation;
use tokio::{
    io::AsyncWriteExt,
    time::{Instant, sleep},
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Attempts at drawing a destination name that does not exist yet.
const MAX_NAME_ATTEMPTS: u32 = 4;

/// Owns the record → stop → persist pipeline.
///
/// Recordings are copied out of the recorder's working file into a stable
/// location, because the next session may overwrite the working file.
pub struct RecordingController {
    recorder: Box<dyn Recorder>,
    files: Arc<dyn FileStore>,
    audio_session: Arc<dyn AudioSession>,
    extension: String,
    settle: SettleDelays,
    readiness: ReadinessPolicy,
    phase: RecordingPhase,
}

impl RecordingController {
    /// Create a controller around the given capabilities.
    pub fn new(
        recorder: Box<dyn Recorder>,
        files: Arc<dyn FileStore>,
        audio_session: Arc<dyn AudioSession>,
        config: &SessionConfig,
    ) -> Self {
        Self {
            recorder,
            files,
            audio_session,
            extension: config.extension.clone(),
            settle: config.settle,
            readiness: config.readiness,
            phase: RecordingPhase::Idle,
        }
    }

    /// Current phase of the state machine.
    pub fn phase(&self) -> RecordingPhase {
        self.phase
    }

    /// State reported by the recorder.
    pub fn recorder_state(&self) -> RecorderState {
        self.recorder.state()
    }

    /// Configure the audio mode, prepare the recorder and start capturing.
    ///
    /// Any failure leaves the controller `Idle`.
    ///
    /// # Errors
    ///
    /// [`VoiceNoteError::AlreadyRecording`] when a session is active,
    /// [`VoiceNoteError::RecordingStartFailed`] when a capability fails.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> CoreResult<()> {
        if !self.phase.is_idle() {
            return Err(VoiceNoteError::AlreadyRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let session_id = Uuid::new_v4();
        self.phase = RecordingPhase::Preparing { session_id };

        if let Err(e) = self.prepare_and_start().await {
            self.phase = RecordingPhase::Idle;
            return Err(VoiceNoteError::RecordingStartFailed {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.phase = RecordingPhase::Recording {
            started_at: Instant::now(),
            session_id,
        };
        info!(session_id = %session_id, "Recording started");

        Ok(())
    }

    async fn prepare_and_start(&mut self) -> CoreResult<()> {
        self.audio_session.set_audio_mode(AudioMode::RECORDING).await?;
        self.recorder.prepare().await?;
        self.recorder.start().await
    }

    /// Pause the session, or stop it when the recorder cannot pause.
    ///
    /// Returns the persisted recording when the fallback stop ran.
    #[instrument(skip(self))]
    pub async fn pause(&mut self) -> CoreResult<Option<Recording>> {
        let RecordingPhase::Recording {
            started_at,
            session_id,
        } = self.phase
        else {
            return Err(VoiceNoteError::NotRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        };

        if !self.recorder.supports_pause() {
            debug!(session_id = %session_id, "Recorder cannot pause, stopping instead");
            return self.stop().await.map(Some);
        }

        self.recorder.pause().await?;
        self.phase = RecordingPhase::Paused {
            started_at,
            session_id,
        };
        info!(session_id = %session_id, "Recording paused");

        Ok(None)
    }

    /// Resume a paused session.
    #[instrument(skip(self))]
    pub async fn resume(&mut self) -> CoreResult<()> {
        let RecordingPhase::Paused {
            started_at,
            session_id,
        } = self.phase
        else {
            return Err(VoiceNoteError::NotRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        };

        self.recorder.start().await?;
        self.phase = RecordingPhase::Recording {
            started_at,
            session_id,
        };
        info!(session_id = %session_id, "Recording resumed");

        Ok(())
    }

    /// Stop the recorder, verify its output and copy it to a stable location.
    ///
    /// The returned [`Recording`] points at the copy. On any failure nothing
    /// is produced and the recorder's working file may be left behind.
    ///
    /// # Errors
    ///
    /// [`VoiceNoteError::NotRecording`], [`VoiceNoteError::RecordingFailed`],
    /// [`VoiceNoteError::FileMissing`], [`VoiceNoteError::FileEmpty`] or
    /// [`VoiceNoteError::CopyFailed`].
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> CoreResult<Recording> {
        let (started_at, session_id) = match self.phase {
            RecordingPhase::Recording {
                started_at,
                session_id,
            }
            | RecordingPhase::Paused {
                started_at,
                session_id,
            } => (started_at, session_id),
            _ => {
                return Err(VoiceNoteError::NotRecording {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        self.phase = RecordingPhase::Stopping { session_id };
        let result = self.stop_and_persist().await;
        self.phase = RecordingPhase::Idle;

        match &result {
            Ok(recording) => info!(
                session_id = %session_id,
                uri = %recording.uri(),
                duration_ms = recording.duration_ms(),
                wall_ms = started_at.elapsed().as_millis(),
                "Recording saved"
            ),
            Err(e) => warn!(session_id = %session_id, error = %e, "Recording discarded"),
        }

        result
    }

    async fn stop_and_persist(&mut self) -> CoreResult<Recording> {
        settle(self.settle.before_stop).await;
        let stopped = self.recorder.stop().await;
        settle(self.settle.after_stop).await;

        let uri = stopped
            .map_err(|e| VoiceNoteError::RecordingFailed {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?
            .or_else(|| self.recorder.uri())
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| VoiceNoteError::RecordingFailed {
                reason: "No URI found".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(uri = %uri, "Recorder produced file");

        let size = self.wait_until_ready(&uri).await?;
        let duration_ms = self.recorder.state().duration_millis;

        let bytes = self
            .files
            .read_bytes(&uri)
            .await
            .map_err(|e| VoiceNoteError::CopyFailed {
                reason: format!("Failed to read {}: {}", uri, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(uri = %uri, size, read = bytes.len(), "Source file read");

        let stable_uri = self.persist(&bytes).await?;

        Ok(Recording::new(stable_uri, duration_ms, Utc::now()))
    }

    /// Poll until `uri` exists with non-zero size, for a fixed number of attempts.
    async fn wait_until_ready(&self, uri: &str) -> CoreResult<u64> {
        let attempts = self.readiness.attempts.max(1);
        let mut seen = false;

        for attempt in 1..=attempts {
            if self.files.exists(uri).await {
                seen = true;
                match self.files.size(uri).await {
                    Ok(size) if size > 0 => return Ok(size),
                    Ok(_) => debug!(uri = %uri, attempt, "Recording file still empty"),
                    Err(e) => debug!(uri = %uri, attempt, error = %e, "Size check failed"),
                }
            } else {
                debug!(uri = %uri, attempt, "Recording file not present yet");
            }

            if attempt < attempts {
                sleep(self.readiness.backoff).await;
            }
        }

        let uri = uri.to_string();
        let location = ErrorLocation::from(Location::caller());
        Err(if seen {
            VoiceNoteError::FileEmpty {
                uri,
                attempts,
                location,
            }
        } else {
            VoiceNoteError::FileMissing {
                uri,
                attempts,
                location,
            }
        })
    }

    /// Write `bytes` to a new stable location, falling back to the alternate
    /// creation primitive once.
    async fn persist(&self, bytes: &[u8]) -> CoreResult<String> {
        let primary = match self.write_primary(bytes).await {
            Ok(uri) => return Ok(uri),
            Err(e) => e,
        };
        warn!(error = %primary, "Primary write failed, trying fallback");

        self.write_fallback(bytes)
            .await
            .map_err(|fallback| VoiceNoteError::CopyFailed {
                reason: format!("primary: {}; fallback: {}", primary, fallback),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    async fn write_primary(&self, bytes: &[u8]) -> CoreResult<String> {
        let uri = self.unused_destination().await;
        let writer = self.files.open_writer(&uri).await?;
        write_scoped(writer, bytes).await?;
        self.verify_written(&uri, bytes.len()).await?;

        debug!(uri = %uri, size = bytes.len(), "Recording copied");
        Ok(uri)
    }

    async fn write_fallback(&self, bytes: &[u8]) -> CoreResult<String> {
        let file_name = stable_file_name(&self.extension);
        let (uri, writer) = self.files.create_file(&file_name).await?;
        write_scoped(writer, bytes).await?;
        self.verify_written(&uri, bytes.len()).await?;

        debug!(uri = %uri, size = bytes.len(), "Recording copied (fallback)");
        Ok(uri)
    }

    /// Draw destination names until one is not already taken.
    async fn unused_destination(&self) -> String {
        let mut uri = self.files.stable_uri(&stable_file_name(&self.extension));
        for _ in 1..MAX_NAME_ATTEMPTS {
            if !self.files.exists(&uri).await {
                break;
            }
            uri = self.files.stable_uri(&stable_file_name(&self.extension));
        }
        uri
    }

    async fn verify_written(&self, uri: &str, expected: usize) -> CoreResult<()> {
        let written = self.files.size(uri).await?;
        if written == 0 || written != expected as u64 {
            return Err(VoiceNoteError::IoError {
                source: std::io::Error::other(format!(
                    "wrote {} of {} bytes to {}",
                    written, expected, uri
                )),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

/// Write and close `writer`. The writer is shut down even if the write fails.
async fn write_scoped(mut writer: FileWriter, bytes: &[u8]) -> std::io::Result<()> {
    let written = writer.write_all(bytes).await;
    let closed = writer.shutdown().await;
    written.and(closed)
}
