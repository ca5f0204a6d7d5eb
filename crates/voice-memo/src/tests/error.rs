use crate::AppError;

use voice_memo_core::VoiceNoteError;

use std::panic::Location;

use error_location::ErrorLocation;

/// WHAT: Device failures reach the console through the core error
/// WHY: The app has a single path for audio device errors
#[test]
fn given_device_failure_when_converted_then_core_variant_with_device_alert() {
    // Given: A device error raised by a host capability
    let source = VoiceNoteError::device("No microphone found");

    // When: Converting at the app boundary
    let error = AppError::from(source);

    // Then: Wrapped as Core and shown with the core's alert text
    assert!(matches!(
        error,
        AppError::Core {
            source: VoiceNoteError::DeviceError { .. },
            ..
        }
    ));
    assert_eq!(error.alert_text(), "Audio device error");
}

/// WHAT: Recording-in-progress refusals show an actionable alert
/// WHY: The user must know to stop recording before playing
#[test]
fn given_recording_in_progress_when_alerting_then_tells_user_to_stop() {
    let error = AppError::from(VoiceNoteError::RecordingInProgress {
        location: ErrorLocation::from(Location::caller()),
    });

    assert_eq!(error.alert_text(), "Stop recording before playing a voice note");
}
