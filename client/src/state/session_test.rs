use super::*;

fn connected() -> SessionState {
    let mut state = SessionState::default();
    state.start(ChatMode::Text);
    assert!(state.on_matched());
    state
}

// =============================================================
// Defaults and lifecycle
// =============================================================

#[test]
fn session_state_default_is_idle_text() {
    let state = SessionState::default();
    assert_eq!(state.status, SessionStatus::Idle);
    assert_eq!(state.mode, ChatMode::Text);
    assert!(state.messages.is_empty());
    assert!(!state.ban.active);
}

#[test]
fn start_looks_for_stranger_in_requested_mode() {
    let mut state = SessionState::default();
    state.start(ChatMode::Video);
    assert_eq!(state.status, SessionStatus::Looking);
    assert_eq!(state.mode, ChatMode::Video);
}

#[test]
fn matched_connects_and_resets_timer() {
    let mut state = SessionState::default();
    state.start(ChatMode::Text);
    state.tick();
    state.tick();
    assert_eq!(state.elapsed_secs, 2);
    assert!(state.on_matched());
    assert_eq!(state.status, SessionStatus::Connected);
    assert_eq!(state.elapsed_secs, 0);
}

#[test]
fn stranger_disconnect_keeps_messages() {
    let mut state = connected();
    state.on_stranger_message("hello");
    state.on_stranger_disconnect();
    assert_eq!(state.status, SessionStatus::Disconnected);
    assert_eq!(state.messages.len(), 1);
}

#[test]
fn end_discards_everything() {
    let mut state = connected();
    state.on_stranger_message("hello");
    state.end();
    assert_eq!(state.status, SessionStatus::Idle);
    assert!(state.messages.is_empty());
}

// =============================================================
// Messages
// =============================================================

#[test]
fn compose_empty_input_is_noop() {
    let mut state = connected();
    assert_eq!(state.compose(""), None);
    assert_eq!(state.compose("   \n\t"), None);
    assert!(state.messages.is_empty());
}

#[test]
fn compose_trims_and_records_own_line() {
    let mut state = connected();
    assert_eq!(state.compose("  hi there  "), Some("hi there".to_owned()));
    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages[0].sender, Sender::Me);
    assert_eq!(state.messages[0].text, "hi there");
}

#[test]
fn compose_while_looking_sends_nothing() {
    let mut state = SessionState::default();
    state.start(ChatMode::Text);
    assert_eq!(state.compose("anyone?"), None);
    assert!(state.messages.is_empty());
}

#[test]
fn stranger_message_ignored_when_not_connected() {
    let mut state = SessionState::default();
    state.start(ChatMode::Text);
    assert!(!state.on_stranger_message("early"));
    assert!(state.messages.is_empty());
}

#[test]
fn messages_keep_arrival_order_with_unique_ids() {
    let mut state = connected();
    state.on_stranger_message("one");
    let _ = state.compose("two");
    state.on_stranger_message("three");
    let texts: Vec<_> = state.messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["one", "two", "three"]);
    assert!(state.messages.windows(2).all(|w| w[0].id < w[1].id));
}

// =============================================================
// Next
// =============================================================

#[test]
fn next_clears_messages_and_resets_status() {
    let mut state = connected();
    state.on_stranger_message("hello");
    let _ = state.compose("bye");
    state.tick();
    assert!(state.next());
    assert!(state.messages.is_empty());
    assert_eq!(state.status, SessionStatus::Looking);
    assert_eq!(state.status.label(), "Looking for someone you can chat with...");
    assert_eq!(state.elapsed_secs, 0);
}

#[test]
fn next_is_refused_while_banned() {
    let mut state = connected();
    state.on_banned(10);
    assert!(!state.next());
    assert_eq!(state.status, SessionStatus::Banned);
    assert!(!state.can_next());
}

// =============================================================
// Ban countdown
// =============================================================

#[test]
fn banned_starts_countdown_and_clears_conversation() {
    let mut state = connected();
    state.on_stranger_message("hello");
    assert!(state.on_banned(3));
    assert_eq!(state.ban, BanState { active: true, remaining_secs: 3 });
    assert_eq!(state.status, SessionStatus::Banned);
    assert!(state.messages.is_empty());
}

#[test]
fn ban_countdown_decrements_once_per_tick() {
    let mut state = SessionState::default();
    state.on_banned(3);
    state.tick();
    assert_eq!(state.ban.remaining_secs, 2);
    state.tick();
    assert_eq!(state.ban.remaining_secs, 1);
    assert!(state.ban.active);
}

#[test]
fn ban_clears_when_countdown_reaches_zero() {
    let mut state = SessionState::default();
    state.on_banned(2);
    state.tick();
    state.tick();
    assert_eq!(state.ban, BanState::default());
    assert_eq!(state.status, SessionStatus::Disconnected);
    assert!(state.can_next());

    // Further ticks do nothing to the cleared ban.
    state.tick();
    assert_eq!(state.ban, BanState::default());
}

#[test]
fn zero_duration_ban_is_ignored() {
    let mut state = connected();
    assert!(!state.on_banned(0));
    assert_eq!(state.status, SessionStatus::Connected);
}

#[test]
fn matched_is_ignored_while_banned() {
    let mut state = SessionState::default();
    state.on_banned(5);
    assert!(!state.on_matched());
    assert_eq!(state.status, SessionStatus::Banned);
}

#[test]
fn disconnect_does_not_lift_ban() {
    let mut state = SessionState::default();
    state.on_banned(5);
    state.on_stranger_disconnect();
    assert_eq!(state.status, SessionStatus::Banned);
}

#[test]
fn timer_does_not_run_when_disconnected() {
    let mut state = connected();
    state.on_stranger_disconnect();
    state.tick();
    assert_eq!(state.elapsed_secs, 0);
}

// =============================================================
// ChatMode
// =============================================================

#[test]
fn chat_mode_parses_query_value() {
    assert_eq!(ChatMode::from_query(Some("video")), ChatMode::Video);
    assert_eq!(ChatMode::from_query(Some(" VIDEO ")), ChatMode::Video);
    assert_eq!(ChatMode::from_query(Some("text")), ChatMode::Text);
    assert_eq!(ChatMode::from_query(Some("audio")), ChatMode::Text);
    assert_eq!(ChatMode::from_query(None), ChatMode::Text);
}

#[test]
fn chat_mode_round_trips_through_query_string() {
    for mode in [ChatMode::Text, ChatMode::Video] {
        assert_eq!(ChatMode::from_query(Some(mode.as_str())), mode);
    }
}
