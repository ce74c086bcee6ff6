//! Inbound channel event handling.
//!
//! `apply_channel_event` is the single place where a decoded [`ChannelEvent`]
//! touches session state. It returns the call actions the peer wrapper must
//! run, so the routing rules stay testable without a browser.

#[cfg(test)]
#[path = "channel_dispatch_test.rs"]
mod channel_dispatch_test;

use events::{ChannelEvent, IceCandidate, SessionDescription};

use crate::state::session::{ChatMode, SessionState, SessionStatus};

/// Work for the peer connection wrapper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallAction {
    StartOffer,
    AcceptOffer(SessionDescription),
    ApplyAnswer(SessionDescription),
    AddIce(IceCandidate),
    Close,
}

/// Apply one inbound event to the session.
pub fn apply_channel_event(session: &mut SessionState, event: ChannelEvent) -> Vec<CallAction> {
    let video = session.mode == ChatMode::Video;

    match event {
        ChannelEvent::Matched => {
            if session.on_matched() && video {
                return vec![CallAction::StartOffer];
            }
        }
        ChannelEvent::Message(text) => {
            session.on_stranger_message(&text);
        }
        ChannelEvent::Disconnect => {
            session.on_stranger_disconnect();
            if video {
                return vec![CallAction::Close];
            }
        }
        ChannelEvent::Banned { seconds } => {
            if session.on_banned(seconds) && video {
                return vec![CallAction::Close];
            }
        }
        // The stranger may see `matched` and send an offer before our own
        // `matched` arrives, so offers are taken while still looking.
        ChannelEvent::Offer(desc) => {
            if video && matches!(session.status, SessionStatus::Looking | SessionStatus::Connected) {
                return vec![CallAction::AcceptOffer(desc)];
            }
        }
        ChannelEvent::Answer(desc) => {
            if video && session.status == SessionStatus::Connected {
                return vec![CallAction::ApplyAnswer(desc)];
            }
        }
        ChannelEvent::Ice(candidate) => {
            if video && matches!(session.status, SessionStatus::Looking | SessionStatus::Connected) {
                return vec![CallAction::AddIce(candidate)];
            }
        }
    }
    Vec::new()
}
