use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Voice note session errors with source location tracking.
#[derive(Error, Debug)]
pub enum VoiceNoteError {
    /// Microphone permission was not granted.
    #[error("Recording permission denied {location}")]
    PermissionDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A recording session is already active.
    #[error("A recording is already in progress {location}")]
    AlreadyRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Playback was requested while a recording session is active.
    #[error("Cannot play while a recording is in progress {location}")]
    RecordingInProgress {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Stop or pause was requested with no active recording session.
    #[error("No recording in progress {location}")]
    NotRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The recorder could not be configured, prepared or started.
    #[error("Failed to start recording: {reason} {location}")]
    RecordingStartFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The recorder did not produce a usable recording on stop.
    #[error("Recording failed: {reason} {location}")]
    RecordingFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The recorder's output file never appeared.
    #[error("Recording file does not exist: {uri} (after {attempts} attempts) {location}")]
    FileMissing {
        /// URI reported by the recorder.
        uri: String,
        /// Readiness checks performed.
        attempts: u32,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The recorder's output file stayed empty.
    #[error("Recording file is empty: {uri} (after {attempts} attempts) {location}")]
    FileEmpty {
        /// URI reported by the recorder.
        uri: String,
        /// Readiness checks performed.
        attempts: u32,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Both the primary and the fallback persistence writes failed.
    #[error("Failed to save recording: {reason} {location}")]
    CopyFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The playback target is unknown or its file does not exist.
    #[error("Recording file not found: {uri} {location}")]
    PlaybackFileNotFound {
        /// Requested URI.
        uri: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The playback target's file is empty.
    #[error("Recording file is empty: {uri} {location}")]
    PlaybackFileEmpty {
        /// Requested URI.
        uri: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The player failed while loading or playing.
    #[error("Playback failed: {reason} {location}")]
    PlaybackFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No stored recording has this URI.
    #[error("Recording not found: {uri} {location}")]
    RecordingNotFound {
        /// Requested URI.
        uri: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A recording with this URI (or an empty URI) is already stored.
    #[error("Recording URI already stored or empty: {uri:?} {location}")]
    DuplicateRecording {
        /// Offending URI.
        uri: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The backing file of a recording could not be removed.
    #[error("Failed to delete recording {uri}: {reason} {location}")]
    DeleteFailed {
        /// URI of the recording.
        uri: String,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio hardware operation failed.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    IoError {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl VoiceNoteError {
    /// Short text suitable for an alert shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied { .. } => "Permission to access the microphone is required",
            Self::AlreadyRecording { .. } => "A recording is already in progress",
            Self::RecordingInProgress { .. } => "Stop recording before playing a voice note",
            Self::NotRecording { .. } => "Nothing is being recorded",
            Self::RecordingStartFailed { .. } => "Failed to start recording",
            Self::RecordingFailed { .. } => "Recording failed: No URI found",
            Self::FileMissing { .. } => "Recording file does not exist",
            Self::FileEmpty { .. } => "Recording file is empty",
            Self::CopyFailed { .. } => "Failed to save recording. Please try again.",
            Self::PlaybackFileNotFound { .. } => "Recording file not found",
            Self::PlaybackFileEmpty { .. } => "Recording file is empty",
            Self::PlaybackFailed { .. } => "Failed to play recording",
            Self::RecordingNotFound { .. } => "Recording not found",
            Self::DuplicateRecording { .. } => "Recording already exists",
            Self::DeleteFailed { .. } => "Failed to delete recording",
            Self::DeviceError { .. } => "Audio device error",
            Self::IoError { .. } => "File access error",
        }
    }

    /// Build a [`VoiceNoteError::DeviceError`] at the caller's location.
    #[track_caller]
    pub fn device(reason: impl Into<String>) -> Self {
        Self::DeviceError {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for VoiceNoteError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        VoiceNoteError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`VoiceNoteError`].
pub type Result<T> = std::result::Result<T, VoiceNoteError>;
