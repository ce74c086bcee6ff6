//! Chat-session state for the stranger chat view.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionState` lives for one mount of the chat page. It holds the
//! pairing status, the message log, the ban countdown, the phase timer and
//! the fixed text/video mode. Every mutation is a plain method so the channel
//! dispatcher, the tick loop and the controls share one set of rules.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

/// Where the session is in its pairing lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    /// Chat view mounted, nothing requested yet.
    #[default]
    Idle,
    /// Waiting for the pairing service to match a stranger.
    Looking,
    /// Paired with a stranger.
    Connected,
    /// The stranger left; the user may press "next".
    Disconnected,
    /// A temporary ban is counting down.
    Banned,
}

impl SessionStatus {
    /// Status line shown above the conversation.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Press start to meet someone new.",
            Self::Looking => "Looking for someone you can chat with...",
            Self::Connected => "You're now chatting with a random stranger. Say hi!",
            Self::Disconnected => "Stranger has disconnected.",
            Self::Banned => "You have been temporarily banned.",
        }
    }

    /// Whether the phase timer runs in this status.
    #[must_use]
    pub fn is_timed(self) -> bool {
        matches!(self, Self::Looking | Self::Connected)
    }
}

/// Text-only or video chat; fixed for the lifetime of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChatMode {
    #[default]
    Text,
    Video,
}

impl ChatMode {
    /// Parse the `mode` route query value; anything but `video` is text.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(mode) if mode.eq_ignore_ascii_case("video") => Self::Video,
            _ => Self::Text,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Video => "video",
        }
    }
}

/// Author of a chat line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    Me,
    Stranger,
}

impl Sender {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Me => "You",
            Self::Stranger => "Stranger",
        }
    }
}

/// A single chat line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    /// Local sequence number, unique within the session.
    pub id: u64,
    pub sender: Sender,
    pub text: String,
}

/// Server-issued temporary ban.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BanState {
    pub active: bool,
    pub remaining_secs: u32,
}

/// State for the chat page.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub status: SessionStatus,
    pub mode: ChatMode,
    pub messages: Vec<ChatMessage>,
    pub ban: BanState,
    /// Whole seconds spent in the current looking/connected phase.
    pub elapsed_secs: u32,
    next_message_id: u64,
}

impl SessionState {
    /// Begin looking for a stranger in `mode`.
    pub fn start(&mut self, mode: ChatMode) {
        self.mode = mode;
        self.messages.clear();
        self.set_status(SessionStatus::Looking);
    }

    /// The pairing service found a stranger. Ignored while banned.
    ///
    /// Returns `true` when the session moved to `Connected`.
    pub fn on_matched(&mut self) -> bool {
        if self.ban.active {
            return false;
        }
        self.set_status(SessionStatus::Connected);
        true
    }

    /// Append a stranger's line. Only accepted while connected.
    pub fn on_stranger_message(&mut self, text: &str) -> bool {
        if self.status != SessionStatus::Connected {
            return false;
        }
        self.push_message(Sender::Stranger, text.to_owned());
        true
    }

    /// Validate the composer input and record it as our own line.
    ///
    /// Returns the text to emit, or `None` when nothing should be sent
    /// (blank input, or no stranger to send to).
    pub fn compose(&mut self, input: &str) -> Option<String> {
        let text = input.trim();
        if text.is_empty() || self.status != SessionStatus::Connected {
            return None;
        }
        self.push_message(Sender::Me, text.to_owned());
        Some(text.to_owned())
    }

    pub fn on_stranger_disconnect(&mut self) {
        if self.status == SessionStatus::Banned {
            return;
        }
        self.set_status(SessionStatus::Disconnected);
    }

    /// Leave the current stranger and look for another.
    ///
    /// Returns `false` (and changes nothing) while a ban is active.
    pub fn next(&mut self) -> bool {
        if self.ban.active {
            return false;
        }
        self.messages.clear();
        self.set_status(SessionStatus::Looking);
        true
    }

    /// Start a ban countdown of `seconds`. A zero duration is ignored.
    pub fn on_banned(&mut self, seconds: u32) -> bool {
        if seconds == 0 {
            return false;
        }
        self.ban = BanState { active: true, remaining_secs: seconds };
        self.messages.clear();
        self.set_status(SessionStatus::Banned);
        true
    }

    /// Advance one second: run the phase timer and the ban countdown.
    pub fn tick(&mut self) {
        if self.ban.active {
            self.ban.remaining_secs = self.ban.remaining_secs.saturating_sub(1);
            if self.ban.remaining_secs == 0 {
                self.ban = BanState::default();
                self.set_status(SessionStatus::Disconnected);
            }
            return;
        }
        if self.status.is_timed() {
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        }
    }

    /// Discard everything (view unmount).
    pub fn end(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn can_send(&self) -> bool {
        self.status == SessionStatus::Connected
    }

    #[must_use]
    pub fn can_next(&self) -> bool {
        !self.ban.active && self.status != SessionStatus::Idle
    }

    /// Reporting needs a stranger on the other end.
    #[must_use]
    pub fn can_report(&self) -> bool {
        self.status == SessionStatus::Connected
    }

    fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
        self.elapsed_secs = 0;
    }

    fn push_message(&mut self, sender: Sender, text: String) {
        self.next_message_id += 1;
        self.messages.push(ChatMessage { id: self.next_message_id, sender, text });
    }
}
