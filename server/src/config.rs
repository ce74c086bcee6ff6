//! Server configuration parsed from environment variables.
//!
//! Required:
//! - `CHANNEL_WS_URL`: channel host, e.g. `wss://ws-eu.pusher.com`
//! - `CHANNEL_APP_KEY`: public app key handed to browsers
//!
//! Optional:
//! - `PORT`: listen port (default 3000)
//! - `CHANNEL_APP_SECRET`: signs private-channel subscriptions; without it
//!   `/api/channel/auth` answers 503
//! - `CHANNEL_NAME`: base of the per-client channel names handed out by
//!   `/api/channel/config` (default `private-strangers`)
//! - `CHANNEL_PREFIX`: channels the auth endpoint will sign (default
//!   `private-strangers`)
//! - `ICE_SERVERS`: comma-separated STUN/TURN urls (default Google STUN)

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CHANNEL_NAME: &str = "private-strangers";
pub const DEFAULT_STUN_URL: &str = "stun:stun.l.google.com:19302";
pub const AUTH_ENDPOINT: &str = "/api/channel/auth";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {var}")]
    Missing { var: &'static str },
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub ws_url: String,
    pub app_key: String,
    pub app_secret: Option<String>,
    pub channel_name: String,
    pub channel_prefix: String,
    pub ice_servers: Vec<String>,
}

impl ServerConfig {
    /// Build typed config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a value
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from any key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid { var: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let ws_url = get("CHANNEL_WS_URL").ok_or(ConfigError::Missing { var: "CHANNEL_WS_URL" })?;
        if !(ws_url.starts_with("ws://") || ws_url.starts_with("wss://")) {
            return Err(ConfigError::Invalid { var: "CHANNEL_WS_URL", value: ws_url });
        }
        let app_key = get("CHANNEL_APP_KEY").ok_or(ConfigError::Missing { var: "CHANNEL_APP_KEY" })?;
        let app_secret = get("CHANNEL_APP_SECRET");

        let channel_name = get("CHANNEL_NAME").unwrap_or_else(|| DEFAULT_CHANNEL_NAME.to_owned());
        let channel_prefix = get("CHANNEL_PREFIX").unwrap_or_else(|| DEFAULT_CHANNEL_NAME.to_owned());
        if !channel_name.starts_with(&channel_prefix) {
            return Err(ConfigError::Invalid { var: "CHANNEL_NAME", value: channel_name });
        }

        let ice_servers = get("ICE_SERVERS").map_or_else(|| vec![DEFAULT_STUN_URL.to_owned()], |raw| parse_ice_servers(&raw));

        Ok(Self { port, ws_url, app_key, app_secret, channel_name, channel_prefix, ice_servers })
    }

    /// Whether private-channel subscriptions can be signed.
    #[must_use]
    pub fn auth_enabled(&self) -> bool {
        self.app_secret.is_some()
    }
}

fn parse_ice_servers(raw: &str) -> Vec<String> {
    let urls: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_owned)
        .collect();
    if urls.is_empty() { vec![DEFAULT_STUN_URL.to_owned()] } else { urls }
}
