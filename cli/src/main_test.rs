use super::*;
use events::{IceCandidate, SessionDescription};

#[test]
fn parse_chat_input_recognizes_commands() {
    assert_eq!(parse_chat_input("/next"), ChatInput::Next);
    assert_eq!(parse_chat_input("  /quit \n"), ChatInput::Quit);
}

#[test]
fn parse_chat_input_blank_line_is_empty() {
    assert_eq!(parse_chat_input(""), ChatInput::Empty);
    assert_eq!(parse_chat_input("   \t"), ChatInput::Empty);
}

#[test]
fn parse_chat_input_trims_messages() {
    assert_eq!(parse_chat_input("  hi there "), ChatInput::Message("hi there".to_owned()));
    assert_eq!(parse_chat_input("/nextish"), ChatInput::Message("/nextish".to_owned()));
}

#[test]
fn absolute_url_joins_relative_paths() {
    assert_eq!(absolute_url("http://h:3000/", "/api/channel/auth"), "http://h:3000/api/channel/auth");
    assert_eq!(absolute_url("http://h:3000", "api/x"), "http://h:3000/api/x");
    assert_eq!(absolute_url("http://h", "https://auth.example.com/sign"), "https://auth.example.com/sign");
}

#[test]
fn chat_line_skips_signaling() {
    assert!(chat_line(&ChannelEvent::Offer(SessionDescription::offer("v=0"))).is_none());
    assert_eq!(chat_line(&ChannelEvent::Message("yo".to_owned())).as_deref(), Some("Stranger: yo"));
    assert_eq!(
        chat_line(&ChannelEvent::Banned { seconds: 30 }).as_deref(),
        Some("You have been banned for 30 seconds.")
    );
}

#[test]
fn describe_event_names_each_event() {
    let ice = IceCandidate {
        candidate: "candidate:1 1 udp 1 10.0.0.1 5000 typ host".to_owned(),
        sdp_mid: None,
        sdp_m_line_index: None,
        username_fragment: None,
    };
    assert_eq!(describe_event(&ChannelEvent::Matched), "matched");
    assert_eq!(describe_event(&ChannelEvent::Banned { seconds: 5 }), "banned 5s");
    assert!(describe_event(&ChannelEvent::Ice(ice)).starts_with("client-ice candidate:1"));
}

#[test]
fn fatal_channel_error_stops_command() {
    let fatal = ControlEvent::Error { message: "over quota".to_owned(), code: Some(4004) };
    assert!(matches!(check_control(&fatal), Err(CliError::Channel { code: Some(4004), .. })));

    let transient = ControlEvent::Error { message: "later".to_owned(), code: Some(4200) };
    assert!(check_control(&transient).is_ok());
    assert!(check_control(&ControlEvent::Pong).is_ok());
}
