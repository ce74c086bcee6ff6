use super::*;

#[test]
fn chat_href_carries_mode_query() {
    assert_eq!(chat_href(ChatMode::Text), "/chat?mode=text");
    assert_eq!(chat_href(ChatMode::Video), "/chat?mode=video");
}

#[test]
fn chat_href_round_trips_through_query_parser() {
    for mode in [ChatMode::Text, ChatMode::Video] {
        let href = chat_href(mode);
        let value = href.split_once("mode=").map(|(_, v)| v);
        assert_eq!(ChatMode::from_query(value), mode);
    }
}
