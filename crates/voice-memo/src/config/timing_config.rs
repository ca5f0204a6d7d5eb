use crate::config::{
    default_player_load_ms, default_player_reset_ms, default_readiness_attempts,
    default_readiness_backoff_ms, default_settle_after_stop_ms, default_settle_before_stop_ms,
};

use serde::{Deserialize, Serialize};

/// Waits around hardware transitions, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Wait before asking the recorder to stop.
    #[serde(default = "default_settle_before_stop_ms")]
    pub settle_before_stop_ms: u64,
    /// Wait after the recorder stopped.
    #[serde(default = "default_settle_after_stop_ms")]
    pub settle_after_stop_ms: u64,
    /// Checks for a non-empty recording file before giving up.
    #[serde(default = "default_readiness_attempts")]
    pub readiness_attempts: u32,
    /// Wait between readiness checks.
    #[serde(default = "default_readiness_backoff_ms")]
    pub readiness_backoff_ms: u64,
    /// Wait after resetting the player.
    #[serde(default = "default_player_reset_ms")]
    pub player_reset_ms: u64,
    /// Wait after loading a new source into the player.
    #[serde(default = "default_player_load_ms")]
    pub player_load_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_before_stop_ms: default_settle_before_stop_ms(),
            settle_after_stop_ms: default_settle_after_stop_ms(),
            readiness_attempts: default_readiness_attempts(),
            readiness_backoff_ms: default_readiness_backoff_ms(),
            player_reset_ms: default_player_reset_ms(),
            player_load_ms: default_player_load_ms(),
        }
    }
}
