//! Host platform primitives consumed by the session controllers.
//!
//! Everything behind these traits is hardware or OS specific; the controllers
//! only sequence calls and interpret results.

mod audio_session;
mod file_store;
mod player;
mod prompt;
mod recorder;

pub use {
    audio_session::{AudioMode, AudioSession},
    file_store::{FileStore, FileWriter},
    player::Player,
    prompt::{ConfirmDialog, PermissionProvider},
    recorder::{Recorder, RecorderConfig, RecorderState},
};
