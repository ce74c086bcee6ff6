//! "Next" and "Report" controls next to the composer.

use leptos::prelude::*;

use crate::components::report_dialog::ReportDialog;
use crate::state::session::{ChatMode, SessionState};
use crate::util::report::ReportReason;

#[component]
pub fn SessionControls(on_next: Callback<()>, on_report: Callback<ReportReason>) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let report_open = RwSignal::new(false);

    let can_next = move || session.read().can_next();
    let can_report = move || {
        let s = session.read();
        s.mode == ChatMode::Video && s.can_report()
    };
    let is_video = move || session.read().mode == ChatMode::Video;

    let on_submit = Callback::new(move |reason: ReportReason| {
        report_open.set(false);
        on_report.run(reason);
    });
    let on_cancel = Callback::new(move |()| report_open.set(false));

    view! {
        <div class="session-controls">
            <button
                class="btn session-controls__next"
                on:click=move |_| on_next.run(())
                disabled=move || !can_next()
                title="Leave this stranger and meet someone new"
            >
                "Next"
            </button>
            <Show when=is_video>
                <button
                    class="btn btn--danger session-controls__report"
                    on:click=move |_| report_open.set(true)
                    disabled=move || !can_report()
                    title="Report this stranger"
                >
                    "Report"
                </button>
            </Show>
            <Show when=move || report_open.get()>
                <ReportDialog on_submit=on_submit on_cancel=on_cancel/>
            </Show>
        </div>
    }
}
