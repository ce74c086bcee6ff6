//! Composer for outgoing chat lines.

use leptos::prelude::*;

use crate::state::session::SessionState;

/// Text input with a send button. Blank input and sends while no stranger
/// is connected are dropped by [`SessionState::compose`].
#[component]
pub fn MessageInput(on_send: Callback<String>) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let input = RwSignal::new(String::new());

    let do_send = move || {
        let text = input.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        on_send.run(text);
        input.set(String::new());
    };

    let on_click = move |_| do_send();

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            do_send();
        }
    };

    let connected = move || session.read().can_send();
    let can_send = move || connected() && !input.read().trim().is_empty();
    let placeholder = move || if connected() { "Type a message..." } else { "Waiting for a stranger..." };

    view! {
        <div class="message-input">
            <input
                class="message-input__field"
                type="text"
                placeholder=placeholder
                disabled=move || !connected()
                prop:value=move || input.get()
                on:input=move |ev| input.set(event_target_value(&ev))
                on:keydown=on_keydown
            />
            <button class="btn btn--primary message-input__send" on:click=on_click disabled=move || !can_send()>
                "Send"
            </button>
        </div>
    }
}
