//! Conversation log for the current stranger.

use leptos::prelude::*;

use crate::state::session::{SessionState, SessionStatus};

#[component]
pub fn MessageList() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let messages_ref = NodeRef::<leptos::html::Div>::new();

    // Keep the newest line in view.
    Effect::new(move || {
        let _ = session.read().messages.len();

        #[cfg(feature = "hydrate")]
        {
            if let Some(el) = messages_ref.get() {
                let scroll_height = el.scroll_height();
                el.set_scroll_top(scroll_height);
            }
        }
    });

    let status_line = move || session.read().status.label();
    let disconnected = move || session.read().status == SessionStatus::Disconnected;

    view! {
        <div class="message-list" node_ref=messages_ref>
            <div class="message-list__status">{status_line}</div>
            {move || {
                session
                    .read()
                    .messages
                    .iter()
                    .map(|msg| {
                        let class = format!(
                            "message-list__message message-list__message--{}",
                            msg.sender.label().to_lowercase()
                        );
                        let author = format!("{}:", msg.sender.label());
                        let text = msg.text.clone();
                        view! {
                            <div class=class>
                                <span class="message-list__author">{author}</span>
                                <span class="message-list__text">{text}</span>
                            </div>
                        }
                    })
                    .collect::<Vec<_>>()
            }}
            <Show when=disconnected>
                <div class="message-list__hint">"Press Next to find someone new."</div>
            </Show>
        </div>
    }
}
