use super::*;

#[test]
fn relayable_candidate_keeps_browser_fields() {
    let c = relayable_candidate(
        "candidate:1 1 udp 2122260223 192.168.1.2 54321 typ host".to_owned(),
        Some("0".to_owned()),
        Some(0),
        Some("abcd".to_owned()),
    )
    .expect("relayable");
    assert_eq!(c.sdp_mid.as_deref(), Some("0"));
    assert_eq!(c.sdp_m_line_index, Some(0));
    assert_eq!(c.username_fragment.as_deref(), Some("abcd"));
}

#[test]
fn end_of_candidates_is_not_relayed() {
    assert!(relayable_candidate(String::new(), Some("0".to_owned()), Some(0), None).is_none());
    assert!(relayable_candidate("  ".to_owned(), None, None, None).is_none());
}

#[test]
fn video_element_ids_are_distinct() {
    assert_ne!(LOCAL_VIDEO_ID, REMOTE_VIDEO_ID);
}

#[test]
fn empty_username_fragment_is_omitted() {
    let c = relayable_candidate("candidate:1".to_owned(), None, Some(0), Some(String::new())).expect("relayable");
    assert_eq!(c.username_fragment, None);
}

// =============================================================
// Signal relay
// =============================================================

#[test]
fn relay_signal_reports_delivery() {
    let mut seen = Vec::new();
    let delivered = relay_signal(
        ClientEvent::Next,
        Some(|event: ClientEvent| {
            seen.push(event);
            Ok::<(), ()>(())
        }),
    );
    assert!(delivered);
    assert_eq!(seen, vec![ClientEvent::Next]);
}

#[test]
fn relay_signal_reports_closed_channel() {
    assert!(!relay_signal(ClientEvent::Next, Some(|_: ClientEvent| Err::<(), _>("closed"))));
}

#[test]
fn relay_signal_reports_unconfigured_client() {
    assert!(!relay_signal(ClientEvent::Next, None::<fn(ClientEvent) -> Result<(), ()>>));
}
