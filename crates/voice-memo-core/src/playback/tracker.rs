use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Emitted by the tracker's timer task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerEvent {
    /// Progress reached 100 for `session_id`.
    Completed {
        /// Playback session that finished.
        session_id: Uuid,
    },
}

/// Receiving half of the tracker's event channel.
pub type TrackerEvents = mpsc::UnboundedReceiver<TrackerEvent>;

/// Latest progress reading.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressSample {
    /// Session the reading belongs to, `None` when stopped.
    pub session_id: Option<Uuid>,
    /// Progress through the clip, `0.0..=100.0`.
    pub percent: f64,
}

/// `elapsed / duration * 100`, clamped to `[0, 100]`. A zero duration is complete.
pub(crate) fn progress_percent(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 100.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64() * 100.0).clamp(0.0, 100.0)
}

/// Polling clock converting elapsed playback time into a percentage.
///
/// At most one timer task exists. The task only publishes progress and a
/// completion event; acting on completion is up to the owner.
pub struct ProgressTracker {
    interval: Duration,
    progress: Arc<watch::Sender<ProgressSample>>,
    events: mpsc::UnboundedSender<TrackerEvent>,
    task: Option<JoinHandle<()>>,
    started_at: Option<Instant>,
    offset: Duration,
}

impl ProgressTracker {
    /// Create a stopped tracker ticking every `interval`.
    pub fn new(interval: Duration) -> (Self, TrackerEvents) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let (progress, _) = watch::channel(ProgressSample::default());

        let tracker = Self {
            interval: interval.max(Duration::from_millis(1)),
            progress: Arc::new(progress),
            events,
            task: None,
            started_at: None,
            offset: Duration::ZERO,
        };

        (tracker, events_rx)
    }

    /// Start tracking `session_id` over `duration`, beginning at `offset`.
    ///
    /// Cancels any running timer first.
    #[instrument(skip(self))]
    pub fn start(&mut self, session_id: Uuid, duration: Duration, offset: Duration) {
        self.cancel();

        let start = Instant::now();
        self.started_at = Some(start);
        self.offset = offset;
        self.progress.send_replace(ProgressSample {
            session_id: Some(session_id),
            percent: progress_percent(offset, duration),
        });

        let progress = Arc::clone(&self.progress);
        let events = self.events.clone();
        let period = self.interval;

        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(start + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let percent = progress_percent(offset + start.elapsed(), duration);

                // A late tick from a cancelled timer must not overwrite a newer session.
                let current = progress.send_if_modified(|sample| {
                    if sample.session_id != Some(session_id) {
                        return false;
                    }
                    sample.percent = percent;
                    true
                });
                if !current {
                    break;
                }

                if percent >= 100.0 {
                    debug!(session_id = %session_id, "Playback progress complete");
                    let _ = events.send(TrackerEvent::Completed { session_id });
                    break;
                }
            }
        }));

        debug!(session_id = %session_id, "Progress tracking started");
    }

    /// Stop the timer and reset progress to zero.
    ///
    /// Returns the clock reading (offset included) at the moment of stopping.
    pub fn stop(&mut self) -> Duration {
        let elapsed = self
            .started_at
            .map(|start| self.offset + start.elapsed())
            .unwrap_or_default();

        self.cancel();
        self.progress.send_replace(ProgressSample::default());

        elapsed
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.started_at = None;
        self.offset = Duration::ZERO;
    }

    /// Whether a timer task is alive.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Latest progress percentage.
    pub fn percent(&self) -> f64 {
        self.progress.borrow().percent
    }

    /// Observe progress updates.
    pub fn subscribe(&self) -> watch::Receiver<ProgressSample> {
        self.progress.subscribe()
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.cancel();
    }
}
