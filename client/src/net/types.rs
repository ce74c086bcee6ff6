//! Shared wire DTOs for the client/server HTTP boundary.
//!
//! DESIGN
//! ======
//! These types mirror the server's `/api/channel/*` responses. Channel
//! events themselves live in the `events` crate.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

pub use events::{ChannelEvent, ClientEvent, IceCandidate, ReportPayload, SessionDescription};

/// Fallback STUN server when the deployment lists none.
pub const DEFAULT_STUN_URL: &str = "stun:stun.l.google.com:19302";

/// Channel and media settings served by `GET /api/channel/config`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Channel host, e.g. `wss://ws-eu.pusher.com`.
    pub ws_url: String,
    pub app_key: String,
    /// Shared channel both paired clients subscribe to.
    pub channel: String,
    /// Where to obtain subscription tokens for private channels.
    pub auth_endpoint: String,
    #[serde(default)]
    pub ice_servers: Vec<IceServer>,
}

impl ClientConfig {
    /// ICE servers to hand to the peer connection, never empty.
    #[must_use]
    pub fn effective_ice_servers(&self) -> Vec<IceServer> {
        if self.ice_servers.iter().any(|s| !s.urls.is_empty()) {
            return self.ice_servers.iter().filter(|s| !s.urls.is_empty()).cloned().collect();
        }
        vec![IceServer { urls: vec![DEFAULT_STUN_URL.to_owned()], username: None, credential: None }]
    }
}

/// One `RTCIceServer` entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServer {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

/// Body of `POST /api/channel/auth`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAuthRequest {
    pub socket_id: String,
    pub channel_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAuthResponse {
    pub auth: String,
}
