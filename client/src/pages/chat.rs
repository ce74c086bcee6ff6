//! Chat page: one session with a random stranger.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page owns the session lifecycle. On mount it fixes the mode from the
//! `?mode=` query, starts looking and makes sure the channel client runs. A
//! one-second tick drives the phase timer and the ban countdown. On unmount
//! the session is discarded, the channel client is stopped and the call is
//! torn down.

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use events::ClientEvent;

use crate::app::ChannelSender;
use crate::components::ban_notice::BanNotice;
use crate::components::message_input::MessageInput;
use crate::components::message_list::MessageList;
use crate::components::session_controls::SessionControls;
use crate::components::status_bar::StatusBar;
use crate::components::toast_stack::ToastStack;
use crate::components::video_panel::VideoPanel;
use crate::net::channel_client::establish_channel;
use crate::net::peer;
use crate::state::channel::ChannelState;
use crate::state::session::{ChatMode, SessionState};
use crate::state::toast::ToastState;
use crate::util::notify::show_toast;
use crate::util::report::{ReportReason, now_ms, submit_report};
use crate::util::snapshot::capture_remote_frame;

#[component]
pub fn ChatPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let channel = expect_context::<RwSignal<ChannelState>>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let sender = expect_context::<RwSignal<ChannelSender>>();
    let query = use_query_map();

    let mode = ChatMode::from_query(query.read_untracked().get("mode").as_deref());
    session.update(|s| s.start(mode));
    establish_channel(sender, session, channel, toasts);

    #[cfg(feature = "hydrate")]
    {
        let tick_alive = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
        let tick_alive_task = tick_alive.clone();
        leptos::task::spawn_local(async move {
            loop {
                gloo_timers::future::sleep(std::time::Duration::from_secs(1)).await;
                if !tick_alive_task.load(std::sync::atomic::Ordering::Relaxed) {
                    break;
                }
                session.update(SessionState::tick);
            }
        });
        on_cleanup(move || tick_alive.store(false, std::sync::atomic::Ordering::Relaxed));
    }

    on_cleanup(move || {
        session.update(SessionState::end);
        sender.update(ChannelSender::close);
        channel.update(ChannelState::release);
        peer::close();
    });

    let on_send = Callback::new(move |input: String| {
        let Some(text) = session.try_update(|s| s.compose(&input)).flatten() else {
            return;
        };
        if !sender.get_untracked().send(ClientEvent::Message(text)) {
            leptos::logging::warn!("message dropped: channel not running");
        }
    });

    let on_next = Callback::new(move |()| {
        if session.try_update(SessionState::next).unwrap_or(false) {
            peer::close();
            let _ = sender.get_untracked().send(ClientEvent::Next);
        }
    });

    let on_report = Callback::new(move |reason: ReportReason| {
        let (kind, notice) = submit_report(capture_remote_frame(), reason, now_ms(), |event| {
            sender.get_untracked().send(event)
        });
        show_toast(toasts, kind, notice);
    });

    let is_video = move || session.read().mode == ChatMode::Video;
    let banned = move || session.read().ban.active;

    view! {
        <div class="chat-page" class:chat-page--video=is_video>
            <StatusBar/>

            <Show when=is_video>
                <VideoPanel/>
            </Show>

            <div class="chat-page__conversation">
                <Show when=banned fallback=move || view! { <MessageList/> }>
                    <BanNotice/>
                </Show>
                <div class="chat-page__composer">
                    <SessionControls on_next=on_next on_report=on_report/>
                    <MessageInput on_send=on_send/>
                </div>
            </div>

            <ToastStack/>
        </div>
    }
}
