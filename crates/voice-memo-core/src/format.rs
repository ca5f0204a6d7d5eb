use std::fmt;

/// A millisecond duration split into whole minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationParts {
    /// Whole seconds.
    pub total_secs: u64,
    /// Whole minutes.
    pub mins: u64,
    /// Remaining seconds, `0..60`.
    pub secs: u64,
}

/// Split `millis` into minutes and seconds, truncating sub-second parts.
pub fn format_duration(millis: u64) -> DurationParts {
    let total_secs = millis / 1000;
    DurationParts {
        total_secs,
        mins: total_secs / 60,
        secs: total_secs % 60,
    }
}

impl fmt::Display for DurationParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.mins, self.secs)
    }
}
