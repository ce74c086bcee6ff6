//! Landing page: pick text or video and start meeting strangers.

#[cfg(test)]
#[path = "landing_test.rs"]
mod landing_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::ChannelSender;
use crate::components::status_bar::StatusBar;
use crate::components::toast_stack::ToastStack;
use crate::net::channel_client::establish_channel;
use crate::state::channel::ChannelState;
use crate::state::session::{ChatMode, SessionState};
use crate::state::toast::ToastState;

/// Chat route for a mode, e.g. `/chat?mode=video`.
pub fn chat_href(mode: ChatMode) -> String {
    format!("/chat?mode={}", mode.as_str())
}

#[component]
pub fn LandingPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let channel = expect_context::<RwSignal<ChannelState>>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let sender = expect_context::<RwSignal<ChannelSender>>();
    let navigate = use_navigate();

    let start = move |mode: ChatMode| {
        establish_channel(sender, session, channel, toasts);
        navigate(&chat_href(mode), NavigateOptions::default());
    };
    let start_text = {
        let start = start.clone();
        move |_| start(ChatMode::Text)
    };
    let start_video = move |_| start(ChatMode::Video);

    view! {
        <div class="landing-page">
            <header class="landing-page__header">
                <h1 class="landing-page__title">"Strangers"</h1>
                <p class="landing-page__tagline">"Talk to someone new. No sign-up, no names."</p>
            </header>

            <section class="landing-page__start">
                <p class="landing-page__prompt">"Start chatting:"</p>
                <div class="landing-page__actions">
                    <button class="btn btn--primary landing-page__action" on:click=start_text>
                        "Text"
                    </button>
                    <span class="landing-page__or">"or"</span>
                    <button class="btn btn--primary landing-page__action" on:click=start_video>
                        "Video"
                    </button>
                </div>
            </section>

            <p class="landing-page__notice">
                "Be respectful. Chats are anonymous, but abusive behaviour can be reported and leads to a temporary ban."
            </p>

            <StatusBar/>
            <ToastStack/>
        </div>
    }
}
