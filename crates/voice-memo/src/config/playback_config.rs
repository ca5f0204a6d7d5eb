use crate::config::default_progress_interval_ms;

use voice_memo_core::ResumePolicy;

use serde::{Deserialize, Serialize};

/// How the progress clock behaves when a paused recording resumes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResumeMode {
    /// Progress restarts from zero.
    #[default]
    Restart,
    /// Progress continues from where it was paused.
    Continue,
}

impl From<ResumeMode> for ResumePolicy {
    fn from(mode: ResumeMode) -> Self {
        match mode {
            ResumeMode::Restart => ResumePolicy::RestartFromZero,
            ResumeMode::Continue => ResumePolicy::ContinueFromOffset,
        }
    }
}

/// Playback configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Progress clock behaviour on resume.
    #[serde(default)]
    pub resume: ResumeMode,
    /// Progress sampling period in milliseconds.
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            resume: ResumeMode::default(),
            progress_interval_ms: default_progress_interval_ms(),
        }
    }
}
