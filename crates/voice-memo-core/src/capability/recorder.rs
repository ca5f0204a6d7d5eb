use crate::{CoreResult, VoiceNoteError};

use async_trait::async_trait;

/// Encoder settings handed to a recorder when it is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfig {
    /// File extension of produced recordings, without the dot.
    pub extension: String,
    /// Target sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count of the produced file.
    pub channels: u16,
    /// Target bit rate for compressed formats. PCM encoders ignore it.
    pub bit_rate: u32,
}

impl RecorderConfig {
    /// Small mono preset suited to voice memos.
    pub fn low_quality(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            sample_rate: 22_050,
            channels: 1,
            bit_rate: 64_000,
        }
    }
}

/// Snapshot of the recorder's own state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecorderState {
    /// Whether audio is currently being captured.
    pub is_recording: bool,
    /// Elapsed capture time of the current or last session.
    pub duration_millis: u64,
}

/// Hardware recording primitive.
///
/// The URI returned from [`Recorder::stop`] may point at volatile storage that
/// the next session overwrites.
#[async_trait]
pub trait Recorder: Send {
    /// Prepare a new session. Resets the duration.
    async fn prepare(&mut self) -> CoreResult<()>;

    /// Begin (or resume) capturing.
    async fn start(&mut self) -> CoreResult<()>;

    /// Whether [`Recorder::pause`] is available on this platform.
    fn supports_pause(&self) -> bool {
        false
    }

    /// Pause capturing without finalizing the file.
    async fn pause(&mut self) -> CoreResult<()> {
        Err(VoiceNoteError::device("Recorder does not support pause"))
    }

    /// Stop capturing and finalize the file, returning its URI if one was produced.
    async fn stop(&mut self) -> CoreResult<Option<String>>;

    /// URI of the current or last recording.
    fn uri(&self) -> Option<String>;

    /// Current recorder state.
    fn state(&self) -> RecorderState;
}
