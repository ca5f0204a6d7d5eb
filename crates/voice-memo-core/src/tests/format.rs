use crate::format_duration;

/// WHAT: Durations render as m:ss
/// WHY: Recording list shows lengths in minutes and padded seconds
#[test]
fn given_millis_when_formatting_then_minutes_and_padded_seconds() {
    let parts = format_duration(65_999);

    assert_eq!(parts.total_secs, 65);
    assert_eq!(parts.mins, 1);
    assert_eq!(parts.secs, 5);
    assert_eq!(parts.to_string(), "1:05");
}

/// WHAT: Sub-second durations round down to zero
/// WHY: Very short memos still display a valid length
#[test]
fn given_sub_second_duration_when_formatting_then_zero() {
    assert_eq!(format_duration(999).to_string(), "0:00");
    assert_eq!(format_duration(600_000).to_string(), "10:00");
}
