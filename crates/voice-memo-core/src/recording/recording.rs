use chrono::{DateTime, Utc};

/// A persisted voice memo.
///
/// Only produced by a successful stop sequence and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    uri: String,
    duration_ms: u64,
    recorded_at: DateTime<Utc>,
}

impl Recording {
    pub(crate) fn new(uri: String, duration_ms: u64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            uri,
            duration_ms,
            recorded_at,
        }
    }

    /// Location of the durable audio file.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Length measured by the recorder, in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// When the file was durably written.
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
