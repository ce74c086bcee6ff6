//! Networking modules for HTTP and the real-time channel.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls, `channel_client` manages the channel socket,
//! `channel_dispatch` routes inbound events onto session state, `negotiation`
//! and `peer` drive the video call, and `types` defines the HTTP wire schema.

pub mod api;
pub mod channel_client;
pub mod channel_dispatch;
pub mod negotiation;
pub mod peer;
pub mod types;
