//! Channel envelope framing (Pusher protocol 7 compatible).
//!
//! Every WebSocket text message is a JSON object `{event, channel?, data}`.
//! Events prefixed `pusher:` or `pusher_internal:` are connection control;
//! everything else is a channel event decoded through [`ChannelEvent`].

#[cfg(test)]
#[path = "envelope_test.rs"]
mod envelope_test;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::ProtocolError;
use crate::event::{ChannelEvent, ClientEvent, unwrap_encoded};

/// Protocol revision announced in the socket URL.
pub const PROTOCOL_VERSION: u8 = 7;

const CLIENT_NAME: &str = "strangers";
const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// One message on the channel socket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// Connection-level control messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlEvent {
    ConnectionEstablished { socket_id: String, activity_timeout: Option<u64> },
    SubscriptionSucceeded { channel: String },
    SubscriptionError { channel: String, status: Option<u16> },
    Ping,
    Pong,
    Error { message: String, code: Option<u16> },
}

impl ControlEvent {
    /// Codes 4000-4099 mean the connection must not be retried.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Error { code: Some(code), .. } if (4000..4100).contains(code))
    }
}

/// A decoded inbound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Incoming {
    Control(ControlEvent),
    Channel { channel: Option<String>, event: ChannelEvent },
    /// Well-formed envelope whose event is outside the contract.
    Ignored(String),
}

/// Decode one inbound socket message.
///
/// # Errors
///
/// Returns [`ProtocolError::Malformed`] when the text is not an envelope and
/// [`ProtocolError::InvalidPayload`] when a known event has a bad payload.
pub fn decode_incoming(text: &str) -> Result<Incoming, ProtocolError> {
    let envelope: Envelope = serde_json::from_str(text)?;
    let name = envelope.event.as_str();

    if name.starts_with("pusher:") || name.starts_with("pusher_internal:") {
        return Ok(match decode_control(&envelope)? {
            Some(control) => Incoming::Control(control),
            None => Incoming::Ignored(envelope.event),
        });
    }

    match ChannelEvent::from_parts(name, &envelope.data)? {
        Some(event) => Ok(Incoming::Channel { channel: envelope.channel, event }),
        None => Ok(Incoming::Ignored(envelope.event)),
    }
}

fn decode_control(envelope: &Envelope) -> Result<Option<ControlEvent>, ProtocolError> {
    let data = unwrap_encoded(&envelope.data);
    let channel = || envelope.channel.clone().unwrap_or_default();

    let event = match envelope.event.as_str() {
        "pusher:connection_established" => {
            let socket_id = data
                .get("socket_id")
                .and_then(Value::as_str)
                .ok_or_else(|| ProtocolError::payload(&envelope.event, "missing socket_id"))?
                .to_owned();
            let activity_timeout = data.get("activity_timeout").and_then(Value::as_u64);
            ControlEvent::ConnectionEstablished { socket_id, activity_timeout }
        }
        "pusher_internal:subscription_succeeded" => ControlEvent::SubscriptionSucceeded { channel: channel() },
        "pusher:subscription_error" => ControlEvent::SubscriptionError {
            channel: channel(),
            status: data.get("status").and_then(Value::as_u64).and_then(|s| u16::try_from(s).ok()),
        },
        "pusher:ping" => ControlEvent::Ping,
        "pusher:pong" => ControlEvent::Pong,
        "pusher:error" => ControlEvent::Error {
            message: data
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_owned(),
            code: data.get("code").and_then(Value::as_u64).and_then(|c| u16::try_from(c).ok()),
        },
        _ => return Ok(None),
    };
    Ok(Some(event))
}

/// Encode an outbound client event for `channel`.
#[must_use]
pub fn encode_client_event(channel: &str, event: &ClientEvent) -> String {
    let envelope = Envelope { event: event.name().to_owned(), channel: Some(channel.to_owned()), data: event.data() };
    serialize(&envelope)
}

/// Subscribe request; `auth` is required for private and presence channels.
#[must_use]
pub fn subscribe_message(channel: &str, auth: Option<&str>) -> String {
    let mut data = json!({ "channel": channel });
    if let Some(auth) = auth {
        data["auth"] = Value::String(auth.to_owned());
    }
    serialize(&Envelope { event: "pusher:subscribe".to_owned(), channel: None, data })
}

#[must_use]
pub fn pong_message() -> String {
    serialize(&Envelope { event: "pusher:pong".to_owned(), channel: None, data: json!({}) })
}

/// Whether subscribing to `channel` needs a server-signed token.
#[must_use]
pub fn requires_auth(channel: &str) -> bool {
    channel.starts_with("private-") || channel.starts_with("presence-")
}

/// Socket URL for an app key on a channel host, e.g. `wss://ws.example.com`.
#[must_use]
pub fn socket_url(ws_url: &str, app_key: &str) -> String {
    let base = ws_url.trim_end_matches('/');
    format!("{base}/app/{app_key}?protocol={PROTOCOL_VERSION}&client={CLIENT_NAME}&version={CLIENT_VERSION}")
}

fn serialize(envelope: &Envelope) -> String {
    // Serializing a struct of strings and `Value`s cannot fail.
    serde_json::to_string(envelope).unwrap_or_default()
}
