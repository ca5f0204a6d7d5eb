mod controller;
mod naming;
#[allow(clippy::module_inception)]
mod recording;
mod state;
mod store;

pub(crate) use naming::stable_file_name;

pub use {
    controller::RecordingController, recording::Recording, state::RecordingPhase,
    store::RecordingStore,
};
