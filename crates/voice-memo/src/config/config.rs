//! Configuration management for voice-memo.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths and atomic write operations, and converts the file sections into the
//! session and recorder settings used by the core.

use crate::{
    AppError, AppResult,
    config::{PlaybackConfig, RecordingConfig, StorageConfig, TimingConfig},
};

use voice_memo_core::{
    PlayerSettle, ReadinessPolicy, SessionConfig, SettleDelays, capability::RecorderConfig,
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Recorder encoding settings.
    #[serde(default)]
    pub recording: RecordingConfig,
    /// Storage locations.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Playback behaviour.
    #[serde(default)]
    pub playback: PlaybackConfig,
    /// Hardware settle and retry timings.
    #[serde(default)]
    pub timing: TimingConfig,
}

impl Config {
    /// Load configuration from the platform config directory, creating a
    /// default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, creating a default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            info!(config_path = ?path, "No config found, creating default");
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration loaded");

        Ok(config)
    }

    /// Save configuration to `path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Session settings for the voice note manager.
    pub fn session_config(&self) -> SessionConfig {
        let timing = &self.timing;
        SessionConfig {
            extension: RecorderConfig::from(&self.recording).extension,
            settle: SettleDelays {
                before_stop: Duration::from_millis(timing.settle_before_stop_ms),
                after_stop: Duration::from_millis(timing.settle_after_stop_ms),
            },
            readiness: ReadinessPolicy {
                attempts: timing.readiness_attempts.max(1),
                backoff: Duration::from_millis(timing.readiness_backoff_ms),
            },
            player_settle: PlayerSettle {
                after_reset: Duration::from_millis(timing.player_reset_ms),
                after_load: Duration::from_millis(timing.player_load_ms),
            },
            progress_interval: Duration::from_millis(self.playback.progress_interval_ms.max(1)),
            resume: self.playback.resume.into(),
        }
    }

    /// Encoder settings for the recorder.
    pub fn recorder_config(&self) -> RecorderConfig {
        RecorderConfig::from(&self.recording)
    }

    /// Directory where saved recordings live, created if missing.
    #[track_caller]
    pub fn recordings_dir(&self) -> AppResult<PathBuf> {
        let dir = match &self.storage.recordings_dir {
            Some(dir) => dir.clone(),
            None => Self::project_dirs()?.data_dir().join("recordings"),
        };
        Self::ensure_dir(dir)
    }

    /// Directory holding the recorder's working file, created if missing.
    #[track_caller]
    pub fn cache_dir(&self) -> AppResult<PathBuf> {
        let dir = match &self.storage.cache_dir {
            Some(dir) => dir.clone(),
            None => Self::project_dirs()?.cache_dir().to_path_buf(),
        };
        Self::ensure_dir(dir)
    }

    /// Directory for rolling log files, created if missing.
    #[track_caller]
    pub fn log_dir() -> AppResult<PathBuf> {
        Self::ensure_dir(Self::project_dirs()?.data_dir().join("logs"))
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let config_dir = Self::ensure_dir(Self::project_dirs()?.config_dir().to_path_buf())?;
        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "voice-memo", "Voice-Memo").ok_or_else(|| AppError::ConfigError {
            reason: "Failed to get project directories".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn ensure_dir(dir: PathBuf) -> AppResult<PathBuf> {
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            debug!(dir = ?dir, "Created directory");
        }
        Ok(dir)
    }
}
