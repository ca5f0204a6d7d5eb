//! Timing and policy values for a voice note session.

use std::time::Duration;

use tokio::time::sleep;

/// Bounded waits around the hardware recorder stop.
///
/// On Android the recorder returns from `stop` before the encoder has flushed
/// the file, so reading it immediately can observe a missing or truncated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleDelays {
    /// Wait before issuing the stop call.
    pub before_stop: Duration,
    /// Wait after the stop call returns.
    pub after_stop: Duration,
}

impl SettleDelays {
    /// No settle waits.
    pub const NONE: SettleDelays = SettleDelays {
        before_stop: Duration::ZERO,
        after_stop: Duration::ZERO,
    };

    /// Defaults for the platform this binary was built for.
    pub fn for_current_platform() -> Self {
        if cfg!(target_os = "android") {
            Self {
                before_stop: Duration::from_millis(100),
                after_stop: Duration::from_millis(400),
            }
        } else {
            Self::NONE
        }
    }
}

/// Fixed-attempt polling of the recorder's output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    /// Total checks, including the first one. Zero is treated as one.
    pub attempts: u32,
    /// Delay between checks.
    pub backoff: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            backoff: Duration::from_millis(100),
        }
    }
}

/// Bounded waits while swapping the player's source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerSettle {
    /// Wait after pausing the previous source.
    pub after_reset: Duration,
    /// Wait after loading the new source.
    pub after_load: Duration,
}

impl Default for PlayerSettle {
    fn default() -> Self {
        Self {
            after_reset: Duration::from_millis(200),
            after_load: Duration::from_millis(100),
        }
    }
}

/// How progress is computed when a paused clip is resumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResumePolicy {
    /// Progress restarts from zero over the clip's full duration.
    #[default]
    RestartFromZero,
    /// Progress continues from the offset reached when paused.
    ContinueFromOffset,
}

/// All tunables for a [`VoiceNoteManager`](crate::VoiceNoteManager).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// File extension for persisted recordings, without the dot.
    pub extension: String,
    /// Waits around the recorder stop.
    pub settle: SettleDelays,
    /// Output file readiness polling.
    pub readiness: ReadinessPolicy,
    /// Waits around player source swaps.
    pub player_settle: PlayerSettle,
    /// Progress tracker tick.
    pub progress_interval: Duration,
    /// Progress behaviour on resume.
    pub resume: ResumePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            extension: "wav".to_string(),
            settle: SettleDelays::for_current_platform(),
            readiness: ReadinessPolicy::default(),
            player_settle: PlayerSettle::default(),
            progress_interval: Duration::from_millis(100),
            resume: ResumePolicy::default(),
        }
    }
}

/// Named bounded wait between hardware calls. Zero skips the wait.
pub(crate) async fn settle(delay: Duration) {
    if !delay.is_zero() {
        sleep(delay).await;
    }
}
