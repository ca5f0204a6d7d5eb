use voice_memo_core::{
    CoreResult,
    capability::{AudioMode, AudioSession},
};

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, info};

/// Desktop audio session.
///
/// Desktop hosts have no silent switch or shared route to configure, so the
/// requested mode is only recorded for diagnostics.
#[derive(Debug, Default)]
pub struct HostAudioSession {
    mode: Mutex<Option<AudioMode>>,
}

impl HostAudioSession {
    /// Session with no mode applied yet.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AudioSession for HostAudioSession {
    async fn set_audio_mode(&self, mode: AudioMode) -> CoreResult<()> {
        let previous = self
            .mode
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(mode);

        if previous == Some(mode) {
            debug!(allows_recording = mode.allows_recording, "Audio mode unchanged");
        } else {
            info!(
                plays_in_silent_mode = mode.plays_in_silent_mode,
                allows_recording = mode.allows_recording,
                "Audio mode set"
            );
        }

        Ok(())
    }
}
