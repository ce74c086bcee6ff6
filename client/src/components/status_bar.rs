//! Status bar showing channel connectivity, session status and timer.
//!
//! SYSTEM CONTEXT
//! ==============
//! Renders low-frequency session telemetry so users can see whether the
//! channel is live and how long the current phase has lasted.

#[cfg(test)]
#[path = "status_bar_test.rs"]
mod status_bar_test;

use leptos::prelude::*;

use crate::state::channel::{ChannelState, ChannelStatus};
use crate::state::session::{SessionState, SessionStatus};
use crate::util::countdown::format_clock;

#[component]
pub fn StatusBar() -> impl IntoView {
    let channel = expect_context::<RwSignal<ChannelState>>();
    let session = expect_context::<RwSignal<SessionState>>();

    let status_class = move || channel_status_class(channel.read().status);
    let channel_text = move || channel_label(&channel.read());
    let session_label = move || session.read().status.label();
    let timer = move || session_timer(&session.read());

    view! {
        <div class="status-bar">
            <div class="status-bar__section">
                <span class="status-bar__item">
                    <span class=status_class></span>
                </span>
                <span class="status-bar__item">{channel_text}</span>
            </div>
            <div class="status-bar__section status-bar__section--session">
                <span class="status-bar__item status-bar__status">{session_label}</span>
                {move || {
                    timer().map(|clock| view! {
                        <span class="status-bar__divider"></span>
                        <span class="status-bar__item status-bar__timer">{clock}</span>
                    })
                }}
            </div>
        </div>
    }
}

fn channel_status_class(status: ChannelStatus) -> &'static str {
    match status {
        ChannelStatus::Subscribed => "status-bar__dot status-bar__dot--connected",
        ChannelStatus::Connecting | ChannelStatus::Connected => "status-bar__dot status-bar__dot--connecting",
        ChannelStatus::Disconnected => "status-bar__dot status-bar__dot--disconnected",
    }
}

fn channel_label(channel: &ChannelState) -> String {
    match (&channel.last_error, channel.status) {
        (Some(error), ChannelStatus::Disconnected) => format!("{}: {error}", channel.status.label()),
        _ => channel.status.label().to_owned(),
    }
}

/// Phase clock, shown only while looking or chatting.
fn session_timer(session: &SessionState) -> Option<String> {
    matches!(session.status, SessionStatus::Looking | SessionStatus::Connected)
        .then(|| format_clock(session.elapsed_secs))
}
