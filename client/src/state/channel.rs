//! Channel connection state shown in the status bar.
//!
//! SYSTEM CONTEXT
//! ==============
//! Written by the channel client as the socket moves through connect,
//! subscribe and reconnect; read by the status bar.
//!
//! DESIGN
//! ======
//! At most one channel client owns the state at a time. `claim` hands out a
//! generation number and `release` (chat view cleanup) retires it. A client
//! writes only through [`ChannelState::update_owned`], so a reconnect loop
//! that outlives its view cannot overwrite the state of a newer client or
//! block the next `claim`.

#[cfg(test)]
#[path = "channel_test.rs"]
mod channel_test;

/// Lifecycle of the real-time channel socket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelStatus {
    /// Socket closed or never opened.
    #[default]
    Disconnected,
    /// Handshake or authorization in progress.
    Connecting,
    /// Socket open, `socket_id` assigned, subscription pending.
    Connected,
    /// Subscribed to the shared channel; events flow.
    Subscribed,
}

impl ChannelStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Disconnected => "Offline",
            Self::Connecting => "Connecting...",
            Self::Connected => "Joining channel...",
            Self::Subscribed => "Online",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ChannelState {
    pub status: ChannelStatus,
    /// Socket id assigned by `pusher:connection_established`.
    pub socket_id: Option<String>,
    /// Last transport or protocol error, cleared on subscribe.
    pub last_error: Option<String>,
    /// Set when the provider rejected the app; no reconnect is attempted.
    pub fatal: bool,
    generation: u64,
    claimed: bool,
}

impl ChannelState {
    pub fn connecting(&mut self) {
        self.status = ChannelStatus::Connecting;
        self.socket_id = None;
    }

    pub fn established(&mut self, socket_id: String) {
        self.status = ChannelStatus::Connected;
        self.socket_id = Some(socket_id);
    }

    pub fn subscribed(&mut self) {
        self.status = ChannelStatus::Subscribed;
        self.last_error = None;
    }

    pub fn disconnected(&mut self, error: Option<String>) {
        self.status = ChannelStatus::Disconnected;
        self.socket_id = None;
        if error.is_some() {
            self.last_error = error;
        }
    }

    /// Take ownership for a new channel client and mark it connecting.
    ///
    /// Returns `None` while another client holds the claim or after a fatal
    /// provider error.
    pub fn claim(&mut self) -> Option<u64> {
        if self.claimed || self.fatal {
            return None;
        }
        self.generation = self.generation.wrapping_add(1);
        self.claimed = true;
        self.connecting();
        Some(self.generation)
    }

    /// Retire the current owner and reset to disconnected.
    pub fn release(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.claimed = false;
        self.disconnected(None);
    }

    /// Whether the client started under `generation` still owns the state.
    #[must_use]
    pub fn owns(&self, generation: u64) -> bool {
        self.claimed && self.generation == generation
    }

    /// Apply `f` only for the owning client. Returns whether it ran.
    pub fn update_owned(&mut self, generation: u64, f: impl FnOnce(&mut Self)) -> bool {
        if !self.owns(generation) {
            return false;
        }
        f(self);
        true
    }

    /// The owner could not start; give the claim back with an error.
    pub fn abandon(&mut self, generation: u64, error: String) {
        if self.owns(generation) {
            self.claimed = false;
            self.disconnected(Some(error));
        }
    }
}
