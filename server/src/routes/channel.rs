//! Channel routes: browser configuration and private-channel authorization.
//!
//! DESIGN
//! ======
//! The WASM bundle carries no deployment constants; it asks
//! `GET /api/channel/config` where the channel lives and which per-client
//! channel it listens on. Subscribing to a
//! private channel needs a token bound to the socket id, signed with the app
//! secret so the secret never reaches the browser.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use hmac::{Hmac, Mac};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::AUTH_ENDPOINT;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerDto {
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfigResponse {
    pub ws_url: String,
    pub app_key: String,
    pub channel: String,
    pub auth_endpoint: String,
    pub ice_servers: Vec<IceServerDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelAuthRequest {
    pub socket_id: String,
    pub channel_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAuthResponse {
    pub auth: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChannelAuthError {
    #[error("channel authorization is not configured")]
    NotConfigured,
    #[error("malformed socket id: {0}")]
    BadSocketId(String),
    #[error("channel not allowed: {0}")]
    ChannelNotAllowed(String),
    #[error("invalid signing key")]
    InvalidKey,
}

impl ChannelAuthError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadSocketId(_) => StatusCode::BAD_REQUEST,
            Self::ChannelNotAllowed(_) => StatusCode::FORBIDDEN,
            Self::InvalidKey => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ChannelAuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

// =============================================================================
// SIGNING
// =============================================================================

/// Socket ids look like `123.456`.
pub(crate) fn valid_socket_id(socket_id: &str) -> bool {
    socket_id
        .split_once('.')
        .is_some_and(|(a, b)| is_digits(a) && is_digits(b))
}

fn is_digits(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

/// Token for `channel_name` on `socket_id`: `{app_key}:{hex hmac}`.
///
/// # Errors
///
/// Returns [`ChannelAuthError::InvalidKey`] if the secret cannot key the MAC.
pub(crate) fn sign_subscription(
    app_key: &str,
    app_secret: &str,
    socket_id: &str,
    channel_name: &str,
) -> Result<String, ChannelAuthError> {
    let mut mac = HmacSha256::new_from_slice(app_secret.as_bytes()).map_err(|_| ChannelAuthError::InvalidKey)?;
    mac.update(format!("{socket_id}:{channel_name}").as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());
    Ok(format!("{app_key}:{signature}"))
}

/// A fresh per-client channel under `base`, e.g. `private-strangers-3f09…`.
///
/// Each browser listens on its own channel; the pairing service addresses a
/// client through the name it subscribed to.
pub(crate) fn client_channel_name(base: &str) -> String {
    let bytes: [u8; 16] = rand::rng().random();
    format!("{base}-{}", hex::encode(bytes))
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/channel/config`: where and how the browser joins its channel.
pub async fn channel_config(State(state): State<AppState>) -> Json<ChannelConfigResponse> {
    let config = &state.config;
    Json(ChannelConfigResponse {
        ws_url: config.ws_url.clone(),
        app_key: config.app_key.clone(),
        channel: client_channel_name(&config.channel_name),
        auth_endpoint: AUTH_ENDPOINT.to_owned(),
        ice_servers: vec![IceServerDto { urls: config.ice_servers.clone() }],
    })
}

/// `POST /api/channel/auth`: sign a private-channel subscription.
///
/// # Errors
///
/// See [`ChannelAuthError::status`] for the status of each rejection.
pub async fn channel_auth(
    State(state): State<AppState>,
    Json(body): Json<ChannelAuthRequest>,
) -> Result<Json<ChannelAuthResponse>, ChannelAuthError> {
    let config = &state.config;
    let Some(secret) = config.app_secret.as_deref() else {
        tracing::warn!("channel auth requested but CHANNEL_APP_SECRET is unset");
        return Err(ChannelAuthError::NotConfigured);
    };
    if !valid_socket_id(&body.socket_id) {
        return Err(ChannelAuthError::BadSocketId(body.socket_id));
    }
    if !body.channel_name.starts_with(&config.channel_prefix) {
        tracing::warn!(channel = %body.channel_name, "channel auth refused");
        return Err(ChannelAuthError::ChannelNotAllowed(body.channel_name));
    }

    let auth = sign_subscription(&config.app_key, secret, &body.socket_id, &body.channel_name)?;
    tracing::debug!(socket_id = %body.socket_id, channel = %body.channel_name, "channel auth signed");
    Ok(Json(ChannelAuthResponse { auth }))
}

#[cfg(test)]
#[path = "channel_test.rs"]
mod channel_test;
