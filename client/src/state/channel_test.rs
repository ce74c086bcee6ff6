use super::*;

#[test]
fn channel_status_default_is_disconnected() {
    assert_eq!(ChannelStatus::default(), ChannelStatus::Disconnected);
    assert_eq!(ChannelState::default().status, ChannelStatus::Disconnected);
}

#[test]
fn lifecycle_reaches_subscribed() {
    let mut state = ChannelState::default();
    state.connecting();
    assert_eq!(state.status, ChannelStatus::Connecting);
    state.established("1.2".to_owned());
    assert_eq!(state.socket_id.as_deref(), Some("1.2"));
    assert_eq!(state.status, ChannelStatus::Connected);
    state.subscribed();
    assert_eq!(state.status, ChannelStatus::Subscribed);
}

#[test]
fn subscribe_clears_previous_error() {
    let mut state = ChannelState::default();
    state.disconnected(Some("socket closed".to_owned()));
    state.connecting();
    state.established("1.2".to_owned());
    state.subscribed();
    assert!(state.last_error.is_none());
}

#[test]
fn disconnect_without_error_keeps_last_error() {
    let mut state = ChannelState::default();
    state.disconnected(Some("boom".to_owned()));
    state.disconnected(None);
    assert_eq!(state.last_error.as_deref(), Some("boom"));
    assert!(state.socket_id.is_none());
}

#[test]
fn labels_are_distinct() {
    let labels = [
        ChannelStatus::Disconnected.label(),
        ChannelStatus::Connecting.label(),
        ChannelStatus::Connected.label(),
        ChannelStatus::Subscribed.label(),
    ];
    for (i, a) in labels.iter().enumerate() {
        for b in &labels[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

// =============================================================
// Ownership
// =============================================================

#[test]
fn claim_marks_connecting_and_refuses_second_owner() {
    let mut state = ChannelState::default();
    let generation = state.claim().expect("first claim");
    assert_eq!(state.status, ChannelStatus::Connecting);
    assert!(state.owns(generation));
    assert_eq!(state.claim(), None);
}

#[test]
fn stale_client_cannot_block_restart_after_release() {
    let mut state = ChannelState::default();
    let old = state.claim().expect("claim");

    // View cleanup, then the old reconnect loop wakes from its backoff sleep.
    state.release();
    assert!(!state.update_owned(old, ChannelState::connecting));
    assert_eq!(state.status, ChannelStatus::Disconnected);

    let new = state.claim().expect("restart");
    assert_ne!(new, old);
    assert!(state.owns(new));
    assert!(!state.owns(old));

    // Late writes from the old client leave the new one alone.
    assert!(!state.update_owned(old, |c| c.disconnected(Some("stale".to_owned()))));
    assert_eq!(state.status, ChannelStatus::Connecting);
    assert!(state.last_error.is_none());
}

#[test]
fn abandon_returns_claim_with_error() {
    let mut state = ChannelState::default();
    let generation = state.claim().expect("claim");
    state.abandon(generation, "config unavailable".to_owned());
    assert_eq!(state.status, ChannelStatus::Disconnected);
    assert_eq!(state.last_error.as_deref(), Some("config unavailable"));
    assert!(state.claim().is_some());
}

#[test]
fn fatal_state_refuses_claims() {
    let mut state = ChannelState::default();
    let generation = state.claim().expect("claim");
    state.update_owned(generation, |c| c.fatal = true);
    state.release();
    assert_eq!(state.claim(), None);
}
