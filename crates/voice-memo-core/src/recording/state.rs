use tokio::time::Instant;
use uuid::Uuid;

/// Recording session state machine.
///
/// ```text
/// Idle → Preparing → Recording ⇄ Paused
///                        ↓          ↓
///                      Stopping → Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingPhase {
    /// No session.
    Idle,
    /// Audio mode and recorder are being set up.
    Preparing {
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
    /// Capturing audio.
    Recording {
        /// When capture started.
        started_at: Instant,
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
    /// Capture paused, file not finalized.
    Paused {
        /// When capture started.
        started_at: Instant,
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
    /// Stop, verify and persist in progress.
    Stopping {
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
}

impl RecordingPhase {
    /// Whether no session is active.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether audio is being captured right now.
    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }

    /// Whether a session is paused.
    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused { .. })
    }
}
