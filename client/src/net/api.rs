//! REST API helpers for communicating with the server.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning an error since these endpoints are only
//! meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Result<_, String>` outputs instead of panics so a missing
//! config or a refused channel token turns into a status line and a retry.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::types::ClientConfig;
#[cfg(feature = "hydrate")]
use super::types::{ChannelAuthRequest, ChannelAuthResponse};

/// Server route serving [`ClientConfig`].
pub const CONFIG_ENDPOINT: &str = "/api/channel/config";

#[cfg(any(test, feature = "hydrate"))]
fn config_request_failed_message(status: u16) -> String {
    format!("config request failed: {status}")
}

#[cfg(any(test, feature = "hydrate"))]
fn channel_auth_failed_message(status: u16, channel: &str) -> String {
    match status {
        403 => format!("channel {channel} is not allowed"),
        503 => "channel authorization is not configured".to_owned(),
        _ => format!("channel auth failed: {status}"),
    }
}

/// Fetch channel and media settings from `GET /api/channel/config`.
///
/// # Errors
///
/// Returns an error string if the request fails or the body is not a config.
pub async fn fetch_client_config() -> Result<ClientConfig, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(CONFIG_ENDPOINT)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(config_request_failed_message(resp.status()));
        }
        resp.json::<ClientConfig>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err("not available on server".to_owned())
    }
}

/// Obtain a subscription token for `channel` bound to `socket_id`.
///
/// # Errors
///
/// Returns an error string if the request fails or the server refuses the
/// channel.
pub async fn authorize_channel(endpoint: &str, socket_id: &str, channel: &str) -> Result<String, String> {
    #[cfg(feature = "hydrate")]
    {
        let payload = ChannelAuthRequest { socket_id: socket_id.to_owned(), channel_name: channel.to_owned() };
        let resp = gloo_net::http::Request::post(endpoint)
            .json(&payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(channel_auth_failed_message(resp.status(), channel));
        }
        let body: ChannelAuthResponse = resp.json().await.map_err(|e| e.to_string())?;
        Ok(body.auth)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (endpoint, socket_id, channel);
        Err("not available on server".to_owned())
    }
}
