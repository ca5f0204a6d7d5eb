mod playback_config;
#[allow(clippy::module_inception)]
mod config;
mod recording_config;
mod storage_config;
mod timing_config;

pub(crate) use {
    config::Config,
    playback_config::{PlaybackConfig, ResumeMode},
    recording_config::RecordingConfig,
    storage_config::StorageConfig,
    timing_config::TimingConfig,
};

/// Extension of files written by the WAV encoder.
pub(crate) const WAV_EXTENSION: &str = "wav";
pub(crate) const DEFAULT_SAMPLE_RATE: u32 = 22_050;
pub(crate) const DEFAULT_CHANNELS: u16 = 1;
pub(crate) const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 100;
pub(crate) const DEFAULT_READINESS_ATTEMPTS: u32 = 5;
pub(crate) const DEFAULT_READINESS_BACKOFF_MS: u64 = 100;
pub(crate) const DEFAULT_PLAYER_RESET_MS: u64 = 200;
pub(crate) const DEFAULT_PLAYER_LOAD_MS: u64 = 100;

pub(crate) fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

pub(crate) fn default_channels() -> u16 {
    DEFAULT_CHANNELS
}

pub(crate) fn default_progress_interval_ms() -> u64 {
    DEFAULT_PROGRESS_INTERVAL_MS
}

pub(crate) fn default_readiness_attempts() -> u32 {
    DEFAULT_READINESS_ATTEMPTS
}

pub(crate) fn default_readiness_backoff_ms() -> u64 {
    DEFAULT_READINESS_BACKOFF_MS
}

pub(crate) fn default_player_reset_ms() -> u64 {
    DEFAULT_PLAYER_RESET_MS
}

pub(crate) fn default_player_load_ms() -> u64 {
    DEFAULT_PLAYER_LOAD_MS
}

pub(crate) fn default_settle_before_stop_ms() -> u64 {
    voice_memo_core::SettleDelays::for_current_platform()
        .before_stop
        .as_millis() as u64
}

pub(crate) fn default_settle_after_stop_ms() -> u64 {
    voice_memo_core::SettleDelays::for_current_platform()
        .after_stop
        .as_millis() as u64
}
