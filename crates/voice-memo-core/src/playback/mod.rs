mod controller;
mod state;
mod tracker;

pub(crate) use tracker::progress_percent;

pub use {
    controller::PlaybackController,
    state::{PlaybackPhase, PlaybackState},
    tracker::{ProgressSample, ProgressTracker, TrackerEvent, TrackerEvents},
};
