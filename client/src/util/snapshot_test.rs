use super::*;

#[test]
fn frame_requires_both_dimensions() {
    assert!(frame_available(640, 480));
    assert!(!frame_available(0, 480));
    assert!(!frame_available(640, 0));
    assert!(!frame_available(0, 0));
}

#[test]
fn capture_is_unavailable_outside_the_browser() {
    assert_eq!(capture_remote_frame(), None);
}
