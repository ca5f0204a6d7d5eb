use std::time::Duration;

use uuid::Uuid;

/// Playback session state machine.
///
/// Holding the URI inside the variant makes two simultaneously playing
/// recordings unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// Nothing loaded.
    Idle,
    /// `uri` is playing.
    Playing {
        /// Recording being played.
        uri: String,
        /// Unique session ID, matched against tracker events.
        session_id: Uuid,
    },
    /// `uri` is loaded but paused.
    Paused {
        /// Recording being played.
        uri: String,
        /// Unique session ID, matched against tracker events.
        session_id: Uuid,
        /// Progress clock reading when paused.
        elapsed: Duration,
    },
}

impl PlaybackPhase {
    /// URI of the loaded recording, playing or paused.
    pub fn uri(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Playing { uri, .. } | Self::Paused { uri, .. } => Some(uri),
        }
    }

    /// Session ID of the loaded recording.
    pub fn session_id(&self) -> Option<Uuid> {
        match self {
            Self::Idle => None,
            Self::Playing { session_id, .. } | Self::Paused { session_id, .. } => Some(*session_id),
        }
    }

    /// Whether audio is playing.
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing { .. })
    }
}

/// Observable playback state.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// URI of the loaded recording, if any.
    pub currently_playing_uri: Option<String>,
    /// Whether audio is playing.
    pub is_playing: bool,
    /// Progress through the clip, `0.0..=100.0`.
    pub progress_percent: f64,
}
