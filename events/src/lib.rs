//! Shared channel event model and envelope codec.
//!
//! This crate owns the wire representation used by the browser `client`, the
//! `server` host and the `cli` tool. The pairing backend is external: the
//! only contract is the set of named events exchanged on one shared channel
//! and the JSON payloads they carry.
//!
//! LAYERS
//! ======
//! - [`payload`]: typed payloads (session descriptions, ICE candidates,
//!   abuse reports) using the browser's JSON field names.
//! - [`event`]: inbound [`ChannelEvent`] and outbound [`ClientEvent`] enums
//!   with lenient payload decoding.
//! - [`envelope`]: the Pusher-compatible `{event, channel, data}` framing,
//!   connection control events and subscribe/pong messages.

pub mod envelope;
pub mod event;
pub mod payload;

pub use envelope::{
    ControlEvent, Envelope, Incoming, decode_incoming, encode_client_event, pong_message, requires_auth,
    socket_url, subscribe_message,
};
pub use event::{ChannelEvent, ClientEvent, names};
pub use payload::{IceCandidate, ReportPayload, SdpType, SessionDescription};

/// Error returned when an inbound message cannot be decoded.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The raw text is not a JSON envelope.
    #[error("malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A known event carried a payload of the wrong shape.
    #[error("event `{event}` has an invalid payload: {reason}")]
    InvalidPayload { event: String, reason: String },
}

impl ProtocolError {
    pub(crate) fn payload(event: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPayload { event: event.to_owned(), reason: reason.into() }
    }
}
