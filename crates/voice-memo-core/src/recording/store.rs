use crate::{CoreResult, VoiceNoteError, recording::Recording};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::debug;

/// In-memory, insertion-ordered list of persisted recordings.
///
/// URIs are non-empty and unique across the store. The list lives only as
/// long as the process.
#[derive(Debug, Default)]
pub struct RecordingStore {
    recordings: Vec<Recording>,
}

impl RecordingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `recording` at the end.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceNoteError::DuplicateRecording`] if the URI is empty or
    /// already stored.
    #[track_caller]
    pub fn append(&mut self, recording: Recording) -> CoreResult<()> {
        if recording.uri().is_empty() || self.contains(recording.uri()) {
            return Err(VoiceNoteError::DuplicateRecording {
                uri: recording.uri().to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        debug!(
            uri = %recording.uri(),
            duration_ms = recording.duration_ms(),
            position = self.recordings.len() + 1,
            "Recording stored"
        );
        self.recordings.push(recording);

        Ok(())
    }

    /// Remove and return the recording with `uri`.
    pub fn remove(&mut self, uri: &str) -> Option<Recording> {
        let index = self.position(uri)?;
        Some(self.recordings.remove(index))
    }

    /// Look up a recording by URI.
    pub fn get(&self, uri: &str) -> Option<&Recording> {
        self.recordings.iter().find(|r| r.uri() == uri)
    }

    /// Whether a recording with `uri` is stored.
    pub fn contains(&self, uri: &str) -> bool {
        self.get(uri).is_some()
    }

    /// Zero-based position of `uri` in recording order.
    pub fn position(&self, uri: &str) -> Option<usize> {
        self.recordings.iter().position(|r| r.uri() == uri)
    }

    /// Recording at zero-based `index`.
    pub fn at(&self, index: usize) -> Option<&Recording> {
        self.recordings.get(index)
    }

    /// All recordings in recording order.
    pub fn recordings(&self) -> &[Recording] {
        &self.recordings
    }

    /// Number of stored recordings.
    pub fn len(&self) -> usize {
        self.recordings.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.recordings.is_empty()
    }

    /// Display label for the recording at zero-based `index`.
    pub fn display_name(index: usize) -> String {
        format!("Voice Note #{}", index + 1)
    }
}
