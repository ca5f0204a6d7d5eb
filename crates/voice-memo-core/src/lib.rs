//! Voice Memo Core Library
//!
//! Session manager for capturing and playing back voice memos on top of host
//! recorder, player and filesystem capabilities.
//!
//! # Example
//!
//! ```no_run
//! use voice_memo_core::{Capabilities, CoreResult, SessionConfig, VoiceNoteManager};
//!
//! async fn record_one(capabilities: Capabilities) -> CoreResult<()> {
//!     let (mut manager, _tracker_events) =
//!         VoiceNoteManager::new(capabilities, SessionConfig::default());
//!
//!     manager.start_recording().await?;
//!     tokio::time::sleep(std::time::Duration::from_secs(3)).await;
//!     let recording = manager.stop_recording().await?;
//!
//!     println!("Saved {} ({} ms)", recording.uri(), recording.duration_ms());
//!     Ok(())
//! }
//! ```

pub mod capability;
mod config;
mod error;
mod format;
mod manager;
mod playback;
mod recording;

pub use {
    config::{PlayerSettle, ReadinessPolicy, ResumePolicy, SessionConfig, SettleDelays},
    error::Result as CoreResult,
    error::VoiceNoteError,
    format::{DurationParts, format_duration},
    manager::{Capabilities, DeleteOutcome, VoiceNoteManager},
    playback::{
        PlaybackController, PlaybackPhase, PlaybackState, ProgressSample, ProgressTracker,
        TrackerEvent, TrackerEvents,
    },
    recording::{Recording, RecordingController, RecordingPhase, RecordingStore},
};

#[cfg(test)]
mod tests;
