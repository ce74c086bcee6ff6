//! Temporary ban notice with a live countdown.

use leptos::prelude::*;

use crate::state::session::{SessionState, SessionStatus};
use crate::util::countdown::{ban_message, format_clock};

#[component]
pub fn BanNotice() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let remaining = move || session.read().ban.remaining_secs;

    view! {
        <div class="ban-notice" role="alert">
            <h2 class="ban-notice__title">{SessionStatus::Banned.label()}</h2>
            <div class="ban-notice__clock">{move || format_clock(remaining())}</div>
            <p class="ban-notice__text">{move || ban_message(remaining())}</p>
        </div>
    }
}
