use crate::config::{WAV_EXTENSION, default_channels, default_sample_rate};

use voice_memo_core::capability::RecorderConfig;

use serde::{Deserialize, Serialize};

/// Recorder capture configuration.
///
/// The desktop recorder always writes 16-bit PCM WAV, so neither the file
/// extension nor a bit rate is configurable. Old files that still carry
/// those keys load fine; the keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Sample rate of saved recordings in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Channel count of saved recordings.
    #[serde(default = "default_channels")]
    pub channels: u16,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        let preset = RecorderConfig::low_quality(WAV_EXTENSION);
        Self {
            sample_rate: preset.sample_rate,
            channels: preset.channels,
        }
    }
}

impl From<&RecordingConfig> for RecorderConfig {
    fn from(config: &RecordingConfig) -> Self {
        RecorderConfig {
            sample_rate: config.sample_rate,
            channels: config.channels.clamp(1, 2),
            ..RecorderConfig::low_quality(WAV_EXTENSION)
        }
    }
}
