//! Channel event contract.
//!
//! Inbound events are pushed by the pairing service or relayed from the
//! matched stranger; outbound events describe local user actions. Payload
//! decoding is lenient: the same logical value may arrive as a bare JSON
//! value, a JSON-encoded string, or a small wrapper object.

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;

use serde_json::{Value, json};

use crate::ProtocolError;
use crate::payload::{IceCandidate, ReportPayload, SessionDescription};

/// Event names as they appear on the channel.
pub mod names {
    pub const MATCHED: &str = "matched";
    pub const BANNED: &str = "banned";
    pub const CLIENT_MESSAGE: &str = "client-message";
    pub const CLIENT_DISCONNECT: &str = "client-disconnect";
    pub const CLIENT_OFFER: &str = "client-offer";
    pub const CLIENT_ANSWER: &str = "client-answer";
    pub const CLIENT_ICE: &str = "client-ice";
    pub const CLIENT_NEXT: &str = "client-next";
    pub const CLIENT_REPORT: &str = "client-report";
}

/// An event received on the channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelEvent {
    /// A stranger has been paired with this client.
    Matched,
    /// Text from the stranger.
    Message(String),
    /// The stranger left.
    Disconnect,
    /// The client is temporarily banned for the given duration.
    Banned { seconds: u32 },
    Offer(SessionDescription),
    Answer(SessionDescription),
    Ice(IceCandidate),
}

impl ChannelEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Matched => names::MATCHED,
            Self::Message(_) => names::CLIENT_MESSAGE,
            Self::Disconnect => names::CLIENT_DISCONNECT,
            Self::Banned { .. } => names::BANNED,
            Self::Offer(_) => names::CLIENT_OFFER,
            Self::Answer(_) => names::CLIENT_ANSWER,
            Self::Ice(_) => names::CLIENT_ICE,
        }
    }

    /// Decode an inbound event from its name and raw `data` field.
    ///
    /// Returns `Ok(None)` for event names outside the contract.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidPayload`] when a known event carries a
    /// payload that cannot be interpreted.
    pub fn from_parts(name: &str, data: &Value) -> Result<Option<Self>, ProtocolError> {
        let event = match name {
            names::MATCHED => Self::Matched,
            names::CLIENT_DISCONNECT => Self::Disconnect,
            names::CLIENT_MESSAGE => Self::Message(text_payload(name, data)?),
            names::BANNED => Self::Banned { seconds: seconds_payload(name, data)? },
            names::CLIENT_OFFER => Self::Offer(typed_payload(name, data)?),
            names::CLIENT_ANSWER => Self::Answer(typed_payload(name, data)?),
            names::CLIENT_ICE => Self::Ice(typed_payload(name, data)?),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}

/// An event emitted by this client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientEvent {
    /// Leave the current stranger and ask for a new one.
    Next,
    Message(String),
    Report(ReportPayload),
    Offer(SessionDescription),
    Answer(SessionDescription),
    Ice(IceCandidate),
}

impl ClientEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Next => names::CLIENT_NEXT,
            Self::Message(_) => names::CLIENT_MESSAGE,
            Self::Report(_) => names::CLIENT_REPORT,
            Self::Offer(_) => names::CLIENT_OFFER,
            Self::Answer(_) => names::CLIENT_ANSWER,
            Self::Ice(_) => names::CLIENT_ICE,
        }
    }

    /// JSON payload for the `data` field.
    #[must_use]
    pub fn data(&self) -> Value {
        match self {
            Self::Next => json!({}),
            Self::Message(text) => json!({ "message": text }),
            Self::Report(report) => serde_json::to_value(report).unwrap_or_default(),
            Self::Offer(desc) | Self::Answer(desc) => serde_json::to_value(desc).unwrap_or_default(),
            Self::Ice(candidate) => serde_json::to_value(candidate).unwrap_or_default(),
        }
    }
}

/// Unwrap a JSON-encoded string payload; non-JSON strings are kept as-is.
pub(crate) fn unwrap_encoded(data: &Value) -> Value {
    match data {
        Value::String(raw) => serde_json::from_str::<Value>(raw).unwrap_or_else(|_| data.clone()),
        other => other.clone(),
    }
}

/// Text of a `client-message`.
///
/// The wrapper object may arrive raw or JSON-encoded once by the provider. A
/// plain string is the text itself and is never parsed, so user input that
/// happens to look like JSON is delivered unchanged.
fn text_payload(event: &str, data: &Value) -> Result<String, ProtocolError> {
    let from_wrapper = |map: &serde_json::Map<String, Value>| {
        map.get("message")
            .or_else(|| map.get("text"))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
    };

    let text = match data {
        Value::Object(map) => from_wrapper(map),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Some(from_wrapper(&map).unwrap_or_else(|| raw.clone())),
            _ => Some(raw.clone()),
        },
        _ => None,
    };
    text.ok_or_else(|| ProtocolError::payload(event, "expected a text message"))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn seconds_payload(event: &str, data: &Value) -> Result<u32, ProtocolError> {
    let value = unwrap_encoded(data);
    let raw = match &value {
        Value::Object(map) => map.get("duration").or_else(|| map.get("seconds")).cloned(),
        other => Some(other.clone()),
    };
    let seconds = match raw {
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.floor() as u64)
        }),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ProtocolError::payload(event, "expected a non-negative duration in seconds"))?;

    Ok(u32::try_from(seconds).unwrap_or(u32::MAX))
}

fn typed_payload<T: serde::de::DeserializeOwned>(event: &str, data: &Value) -> Result<T, ProtocolError> {
    serde_json::from_value(unwrap_encoded(data)).map_err(|e| ProtocolError::payload(event, e.to_string()))
}
