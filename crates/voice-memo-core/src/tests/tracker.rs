#![allow(clippy::unwrap_used)]

use crate::{ProgressTracker, TrackerEvent, playback::progress_percent};

use std::time::Duration;

use tokio::time::sleep;
use uuid::Uuid;

const TICK: Duration = Duration::from_millis(100);

/// WHAT: Percentage is clamped to [0, 100]
/// WHY: Elapsed time can overshoot the stored duration
#[test]
fn given_elapsed_beyond_duration_when_computing_then_clamped_to_100() {
    let duration = Duration::from_millis(1000);

    assert_eq!(progress_percent(Duration::ZERO, duration), 0.0);
    assert_eq!(progress_percent(Duration::from_millis(250), duration), 25.0);
    assert_eq!(progress_percent(Duration::from_millis(5000), duration), 100.0);
    assert_eq!(progress_percent(Duration::from_millis(10), Duration::ZERO), 100.0);
}

/// WHAT: Progress rises monotonically and ends at exactly 100 with a completion event
/// WHY: Auto-stop must only fire after the bar is full
#[tokio::test(start_paused = true)]
async fn given_running_tracker_when_duration_elapses_then_monotonic_to_100_and_completed() {
    // Given: A tracker over a one second clip
    let (mut tracker, mut events) = ProgressTracker::new(TICK);
    let mut progress = tracker.subscribe();
    let session_id = Uuid::new_v4();
    tracker.start(session_id, Duration::from_secs(1), Duration::ZERO);
    assert_eq!(tracker.percent(), 0.0);

    // When: Observing every update until completion
    let mut last = 0.0;
    loop {
        progress.changed().await.unwrap();
        let sample = *progress.borrow();
        assert_eq!(sample.session_id, Some(session_id));
        assert!(sample.percent >= last, "{} < {}", sample.percent, last);
        last = sample.percent;
        if last >= 100.0 {
            break;
        }
    }

    // Then: It reached exactly 100 and announced completion of this session
    assert_eq!(last, 100.0);
    assert_eq!(
        events.recv().await,
        Some(TrackerEvent::Completed { session_id })
    );
}

/// WHAT: Starting a new session cancels the previous timer
/// WHY: Only one timer may ever be active
#[tokio::test(start_paused = true)]
async fn given_running_tracker_when_restarted_then_old_session_never_completes() {
    // Given: A tracker running a short session
    let (mut tracker, mut events) = ProgressTracker::new(TICK);
    let first = Uuid::new_v4();
    tracker.start(first, Duration::from_millis(300), Duration::ZERO);

    // When: A second, longer session starts before the first would finish
    sleep(Duration::from_millis(150)).await;
    let second = Uuid::new_v4();
    tracker.start(second, Duration::from_millis(1000), Duration::ZERO);

    // Then: The only completion belongs to the second session
    assert_eq!(
        events.recv().await,
        Some(TrackerEvent::Completed { session_id: second })
    );
    sleep(Duration::from_millis(500)).await;
    assert!(events.try_recv().is_err());
}

/// WHAT: Stopping resets progress and reports the elapsed clock
/// WHY: Pause needs the offset while the bar returns to zero
#[tokio::test(start_paused = true)]
async fn given_running_tracker_when_stopped_then_progress_reset_and_elapsed_returned() {
    // Given: A tracker 400ms into a one second clip
    let (mut tracker, mut events) = ProgressTracker::new(TICK);
    tracker.start(Uuid::new_v4(), Duration::from_secs(1), Duration::ZERO);
    sleep(Duration::from_millis(450)).await;
    assert!(tracker.percent() >= 40.0);

    // When: Stopping it
    let elapsed = tracker.stop();

    // Then: Progress is zero, the timer is gone and no completion arrives
    assert!(elapsed >= Duration::from_millis(450));
    assert_eq!(tracker.percent(), 0.0);
    assert!(!tracker.is_running());
    sleep(Duration::from_secs(2)).await;
    assert!(events.try_recv().is_err());
}

/// WHAT: An offset start continues from the given position
/// WHY: Resume-from-offset policy picks up where playback paused
#[tokio::test(start_paused = true)]
async fn given_offset_when_starting_then_initial_progress_reflects_offset() {
    let (mut tracker, _events) = ProgressTracker::new(TICK);

    tracker.start(
        Uuid::new_v4(),
        Duration::from_secs(2),
        Duration::from_millis(500),
    );

    assert_eq!(tracker.percent(), 25.0);
    sleep(Duration::from_millis(1050)).await;
    assert!(tracker.percent() >= 75.0);
}
