use crate::CoreResult;

use async_trait::async_trait;

/// Audio routing mode requested before recording or playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioMode {
    /// Keep audio audible when the device is muted.
    pub plays_in_silent_mode: bool,
    /// Route the microphone into the session.
    pub allows_recording: bool,
}

impl AudioMode {
    /// Mode used while capturing.
    pub const RECORDING: AudioMode = AudioMode {
        plays_in_silent_mode: true,
        allows_recording: true,
    };

    /// Mode used while playing back.
    pub const PLAYBACK: AudioMode = AudioMode {
        plays_in_silent_mode: true,
        allows_recording: false,
    };
}

/// Platform audio session configuration.
#[async_trait]
pub trait AudioSession: Send + Sync {
    /// Switch the platform audio session into `mode`.
    async fn set_audio_mode(&self, mode: AudioMode) -> CoreResult<()>;
}
