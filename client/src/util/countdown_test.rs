use super::*;

#[test]
fn format_clock_pads_seconds() {
    assert_eq!(format_clock(0), "0:00");
    assert_eq!(format_clock(7), "0:07");
    assert_eq!(format_clock(59), "0:59");
}

#[test]
fn format_clock_rolls_minutes() {
    assert_eq!(format_clock(60), "1:00");
    assert_eq!(format_clock(125), "2:05");
    assert_eq!(format_clock(3600), "60:00");
}

#[test]
fn ban_message_uses_singular_for_last_second() {
    assert_eq!(ban_message(1), "You can chat again in 1 second.");
}

#[test]
fn ban_message_includes_clock_and_seconds() {
    assert_eq!(ban_message(90), "You can chat again in 1:30 (90 seconds).");
}
