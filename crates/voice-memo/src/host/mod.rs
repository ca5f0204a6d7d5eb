//! Desktop implementations of the core's capability traits.

mod audio_session;
pub(crate) mod console;
pub(crate) mod cpal_player;
pub(crate) mod cpal_recorder;
pub(crate) mod fs_store;
mod permission;
mod resampler;

pub(crate) use {
    audio_session::HostAudioSession,
    console::{ConsoleConfirm, ConsoleLines},
    cpal_player::CpalPlayer,
    cpal_recorder::CpalRecorder,
    fs_store::{FsFileStore, path_from_uri, uri_for_path},
    permission::DevicePermission,
    resampler::Resampler,
};
