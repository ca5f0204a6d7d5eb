use crate::AppError;

use std::{panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Commands typed at the console.
///
/// Recording indices are zero-based here and one-based on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Start a new recording.
    Record,
    /// Pause the recording in progress.
    Pause,
    /// Resume a paused recording.
    Resume,
    /// Stop and save the recording in progress.
    Stop,
    /// Play, pause or switch to a stored recording.
    Play {
        /// Position in the recording list.
        index: usize,
    },
    /// Pause playback.
    PausePlayback,
    /// Stop playback.
    StopPlayback,
    /// Delete a stored recording after confirmation.
    Delete {
        /// Position in the recording list.
        index: usize,
    },
    /// Print all recordings.
    List,
    /// Print recorder and player state.
    Status,
    /// Print the command reference.
    Help,
    /// Request application shutdown.
    Quit,
}

/// Console reference printed by `help`.
pub(crate) const HELP: &str = "\
Commands:
  record          start a new recording
  pause           pause the recording
  resume          resume a paused recording
  stop            stop and save the recording
  play N          play, pause or switch to voice note N
  pause-play      pause playback
  stop-play       stop playback
  delete N        delete voice note N
  list            list voice notes
  status          show recorder and player state
  help            show this help
  quit            exit";

impl FromStr for AppCommand {
    type Err = AppError;

    #[track_caller]
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(invalid(line, "Empty command"));
        };
        let argument = words.next();
        if words.next().is_some() {
            return Err(invalid(line, "Too many arguments"));
        }

        let command = match (verb.to_ascii_lowercase().as_str(), argument) {
            ("record" | "r", None) => AppCommand::Record,
            ("pause", None) => AppCommand::Pause,
            ("resume", None) => AppCommand::Resume,
            ("stop" | "s", None) => AppCommand::Stop,
            ("play" | "p", Some(n)) => AppCommand::Play {
                index: parse_index(line, n)?,
            },
            ("pause-play", None) => AppCommand::PausePlayback,
            ("stop-play", None) => AppCommand::StopPlayback,
            ("delete" | "rm", Some(n)) => AppCommand::Delete {
                index: parse_index(line, n)?,
            },
            ("list" | "ls", None) => AppCommand::List,
            ("status", None) => AppCommand::Status,
            ("help" | "?", None) => AppCommand::Help,
            ("quit" | "exit" | "q", None) => AppCommand::Quit,
            ("play" | "p" | "delete" | "rm", None) => {
                return Err(invalid(line, "Missing voice note number"));
            }
            (_, Some(_)) if is_known(verb) => {
                return Err(invalid(line, "Unexpected argument"));
            }
            _ => return Err(invalid(line, "Unknown command")),
        };

        Ok(command)
    }
}

fn is_known(verb: &str) -> bool {
    matches!(
        verb.to_ascii_lowercase().as_str(),
        "record"
            | "r"
            | "pause"
            | "resume"
            | "stop"
            | "s"
            | "pause-play"
            | "stop-play"
            | "list"
            | "ls"
            | "status"
            | "help"
            | "?"
            | "quit"
            | "exit"
            | "q"
    )
}

/// Parse a one-based console number into a zero-based index.
#[track_caller]
fn parse_index(line: &str, number: &str) -> Result<usize, AppError> {
    match number.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(invalid(line, "Voice note numbers start at 1")),
    }
}

#[track_caller]
fn invalid(line: &str, reason: &str) -> AppError {
    AppError::InvalidCommand {
        input: line.trim().to_string(),
        reason: reason.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
