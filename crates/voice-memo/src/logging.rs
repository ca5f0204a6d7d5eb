use crate::{AppError, AppResult, config::Config};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub(crate) const DEFAULT_FILTER: &str = "voice_memo=debug,voice_memo_core=debug";

/// Install the global subscriber writing to a daily rolling file.
///
/// The console is left to the command loop. Keep the returned guard alive
/// until exit so buffered lines are flushed.
#[track_caller]
pub(crate) fn init() -> AppResult<WorkerGuard> {
    let log_dir = Config::log_dir()?;
    let appender = tracing_appender::rolling::daily(&log_dir, "voice-memo.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| AppError::ConfigError {
            reason: format!("Failed to install log subscriber: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    tracing::info!(log_dir = ?log_dir, "Logging initialized");

    Ok(guard)
}
