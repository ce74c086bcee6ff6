//! Typed payloads carried by channel events.
//!
//! Field names follow the browser's `RTCSessionDescriptionInit` and
//! `RTCIceCandidateInit` JSON so payloads produced by a JavaScript peer decode
//! without translation.

#[cfg(test)]
#[path = "payload_test.rs"]
mod payload_test;

use serde::{Deserialize, Serialize};

/// Kind of a session description.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    Offer,
    Answer,
    Pranswer,
    Rollback,
}

/// A session description exchanged during call negotiation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: SdpType,
    #[serde(default)]
    pub sdp: String,
}

impl SessionDescription {
    #[must_use]
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self { kind: SdpType::Offer, sdp: sdp.into() }
    }

    #[must_use]
    pub fn answer(sdp: impl Into<String>) -> Self {
        Self { kind: SdpType::Answer, sdp: sdp.into() }
    }

    /// Session id from the `o=` origin line, if present and numeric.
    ///
    /// `o=- 4611731400430051336 2 IN IP4 127.0.0.1` yields `4611731400430051336`.
    #[must_use]
    pub fn origin_session_id(&self) -> Option<u64> {
        self.sdp
            .lines()
            .find_map(|line| line.trim().strip_prefix("o="))
            .and_then(|origin| origin.split_whitespace().nth(1))
            .and_then(|id| id.parse::<u64>().ok())
    }
}

/// A network candidate for the peer connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default, rename = "sdpMid")]
    pub sdp_mid: Option<String>,
    #[serde(default, rename = "sdpMLineIndex")]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default, rename = "usernameFragment", skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
}

impl IceCandidate {
    /// The empty candidate string signals end-of-candidates.
    #[must_use]
    pub fn is_end_of_candidates(&self) -> bool {
        self.candidate.trim().is_empty()
    }
}

/// Abuse report sent with `client-report`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPayload {
    /// `data:` URL of the captured remote video frame.
    pub screenshot: String,
    pub reason: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}
