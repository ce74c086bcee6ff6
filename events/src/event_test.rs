use super::*;
use crate::payload::SdpType;

// =============================================================
// Inbound decoding
// =============================================================

#[test]
fn matched_and_disconnect_ignore_payload() {
    assert_eq!(
        ChannelEvent::from_parts("matched", &json!({})).expect("decode"),
        Some(ChannelEvent::Matched)
    );
    assert_eq!(
        ChannelEvent::from_parts("client-disconnect", &Value::Null).expect("decode"),
        Some(ChannelEvent::Disconnect)
    );
}

#[test]
fn unknown_event_name_is_not_an_error() {
    assert_eq!(ChannelEvent::from_parts("client-wave", &json!({})).expect("decode"), None);
}

#[test]
fn message_accepts_plain_strings_verbatim() {
    let plain = ChannelEvent::from_parts("client-message", &json!("hi there")).expect("decode");
    assert_eq!(plain, Some(ChannelEvent::Message("hi there".to_owned())));

    let quoted = ChannelEvent::from_parts("client-message", &json!("\"quoted\"")).expect("decode");
    assert_eq!(quoted, Some(ChannelEvent::Message("\"quoted\"".to_owned())));
}

#[test]
fn message_keeps_numeric_looking_text() {
    let event = ChannelEvent::from_parts("client-message", &json!("42")).expect("decode");
    assert_eq!(event, Some(ChannelEvent::Message("42".to_owned())));
}

#[test]
fn message_accepts_wrapper_objects() {
    let event = ChannelEvent::from_parts("client-message", &json!({"message": "yo"})).expect("decode");
    assert_eq!(event, Some(ChannelEvent::Message("yo".to_owned())));
    let event = ChannelEvent::from_parts("client-message", &json!("{\"text\":\"hey\"}")).expect("decode");
    assert_eq!(event, Some(ChannelEvent::Message("hey".to_owned())));
}

#[test]
fn message_wrapper_without_text_field_is_kept_as_typed() {
    let event = ChannelEvent::from_parts("client-message", &json!("{\"a\":1}")).expect("decode");
    assert_eq!(event, Some(ChannelEvent::Message("{\"a\":1}".to_owned())));
}

#[test]
fn message_with_json_looking_text_survives_own_encoding() {
    let typed = ["\"quoted\"", "{\"text\":\"hi\"}", "{\"message\":\"x\"}", "42", "null", "[1,2]", "plain"];
    for text in typed {
        let data = ClientEvent::Message(text.to_owned()).data();
        // Raw, and JSON-encoded once as the provider relays it.
        for delivered in [data.clone(), Value::String(data.to_string())] {
            let event = ChannelEvent::from_parts("client-message", &delivered).expect("decode");
            assert_eq!(event, Some(ChannelEvent::Message(text.to_owned())), "text {text:?} via {delivered}");
        }
    }
}

#[test]
fn message_rejects_non_text_payload() {
    let err = ChannelEvent::from_parts("client-message", &json!([1, 2])).expect_err("should fail");
    assert!(matches!(err, ProtocolError::InvalidPayload { .. }));
}

#[test]
fn banned_accepts_number_string_and_object_forms() {
    for data in [json!(30), json!("30"), json!({"duration": 30}), json!({"seconds": 30}), json!(30.7)] {
        let event = ChannelEvent::from_parts("banned", &data).expect("decode");
        assert_eq!(event, Some(ChannelEvent::Banned { seconds: 30 }), "payload {data}");
    }
}

#[test]
fn banned_rejects_negative_duration() {
    assert!(ChannelEvent::from_parts("banned", &json!(-5)).is_err());
    assert!(ChannelEvent::from_parts("banned", &json!({"until": 5})).is_err());
}

#[test]
fn banned_saturates_huge_durations() {
    let event = ChannelEvent::from_parts("banned", &json!(u64::MAX)).expect("decode");
    assert_eq!(event, Some(ChannelEvent::Banned { seconds: u32::MAX }));
}

#[test]
fn offer_decodes_from_encoded_json_string() {
    let data = json!("{\"type\":\"offer\",\"sdp\":\"v=0\"}");
    let Some(ChannelEvent::Offer(desc)) = ChannelEvent::from_parts("client-offer", &data).expect("decode") else {
        panic!("expected offer");
    };
    assert_eq!(desc.kind, SdpType::Offer);
    assert_eq!(desc.sdp, "v=0");
}

#[test]
fn ice_with_bad_shape_reports_event_name() {
    let err = ChannelEvent::from_parts("client-ice", &json!({"sdpMid": "0"})).expect_err("should fail");
    match err {
        ProtocolError::InvalidPayload { event, .. } => assert_eq!(event, "client-ice"),
        ProtocolError::Malformed(_) => panic!("unexpected error kind"),
    }
}

// =============================================================
// Outbound encoding
// =============================================================

#[test]
fn outbound_names_match_contract() {
    assert_eq!(ClientEvent::Next.name(), "client-next");
    assert_eq!(ClientEvent::Message(String::new()).name(), "client-message");
    assert_eq!(ClientEvent::Offer(SessionDescription::offer("")).name(), "client-offer");
    assert_eq!(ClientEvent::Answer(SessionDescription::answer("")).name(), "client-answer");
}

#[test]
fn message_sends_wrapper_object() {
    assert_eq!(ClientEvent::Message("hi".to_owned()).data(), json!({"message": "hi"}));
}

#[test]
fn next_sends_empty_object() {
    assert_eq!(ClientEvent::Next.data(), json!({}));
}

#[test]
fn report_data_has_screenshot_reason_timestamp() {
    let report = ClientEvent::Report(ReportPayload {
        screenshot: "data:image/jpeg;base64,AAAA".to_owned(),
        reason: "spam".to_owned(),
        timestamp: 1_700_000_000_000,
    });
    assert_eq!(report.name(), "client-report");
    assert_eq!(
        report.data(),
        json!({"screenshot": "data:image/jpeg;base64,AAAA", "reason": "spam", "timestamp": 1_700_000_000_000_i64})
    );
}

#[test]
fn inbound_names_match_contract() {
    assert_eq!(ChannelEvent::Banned { seconds: 1 }.name(), "banned");
    assert_eq!(ChannelEvent::Matched.name(), "matched");
    assert_eq!(ChannelEvent::Disconnect.name(), "client-disconnect");
}
