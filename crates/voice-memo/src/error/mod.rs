use voice_memo_core::VoiceNoteError;

use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Application-level errors for the voice-memo binary.
///
/// All variants include `ErrorLocation` for call-site tracking.
#[derive(Error, Debug)]
pub enum AppError {
    /// Session error from voice-memo-core.
    #[error("Voice note error: {source} {location}")]
    Core {
        /// The underlying session error.
        #[source]
        source: VoiceNoteError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Console input did not parse as a command.
    #[error("Invalid command '{input}': {reason} {location}")]
    InvalidCommand {
        /// The line as typed.
        input: String,
        /// Human-readable reason for rejection.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Failed to send message through async channel.
    #[error("Channel send failed: {message} {location}")]
    ChannelSendFailed {
        /// Human-readable error message.
        message: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Configuration loading or saving error.
    #[error("Configuration error: {reason} {location}")]
    ConfigError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    IoError {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

impl AppError {
    /// Text shown in the console alert.
    pub fn alert_text(&self) -> String {
        match self {
            Self::Core { source, .. } => source.user_message().to_string(),
            Self::InvalidCommand { input, reason, .. } => {
                format!("{} ('{}'). Type 'help' for commands.", reason, input)
            }
            Self::ConfigError { reason, .. } => format!("Configuration error: {}", reason),
            Self::ChannelSendFailed { message, .. } => message.clone(),
            Self::IoError { source, .. } => format!("File access error: {}", source),
        }
    }
}

// Manual From<VoiceNoteError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<VoiceNoteError> for AppError {
    #[track_caller]
    fn from(source: VoiceNoteError) -> Self {
        AppError::Core {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for AppError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        AppError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `AppError`.
pub type Result<T> = StdResult<T, AppError>;
