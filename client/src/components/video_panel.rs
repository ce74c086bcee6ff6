//! Local and remote video surfaces for video mode.
//!
//! The peer wrapper attaches streams to these elements by id.

use leptos::prelude::*;

use crate::net::peer::{LOCAL_VIDEO_ID, REMOTE_VIDEO_ID};
use crate::state::session::{SessionState, SessionStatus};

#[component]
pub fn VideoPanel() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let waiting = move || session.read().status != SessionStatus::Connected;

    view! {
        <div class="video-panel">
            <div class="video-panel__remote">
                <video id=REMOTE_VIDEO_ID class="video-panel__video" autoplay=true playsinline=true></video>
                <Show when=waiting>
                    <div class="video-panel__placeholder">{move || session.read().status.label()}</div>
                </Show>
            </div>
            <div class="video-panel__local">
                <video id=LOCAL_VIDEO_ID class="video-panel__video video-panel__video--mirrored" autoplay=true playsinline=true muted=true></video>
            </div>
        </div>
    }
}
