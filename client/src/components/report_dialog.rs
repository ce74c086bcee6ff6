//! Modal dialog for picking a report reason.

use leptos::prelude::*;

use crate::util::report::ReportReason;

#[component]
pub fn ReportDialog(on_submit: Callback<ReportReason>, on_cancel: Callback<()>) -> impl IntoView {
    let reason = RwSignal::new(ReportReason::default());

    let on_form_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        on_submit.run(reason.get_untracked());
    };

    view! {
        <div class="dialog-backdrop" on:click=move |_| on_cancel.run(())>
            <form
                class="dialog report-dialog"
                on:click=|ev| ev.stop_propagation()
                on:submit=on_form_submit
            >
                <h2 class="dialog__title">"Report stranger"</h2>
                <p class="dialog__text">"A snapshot of their video is attached to the report."</p>
                <div class="report-dialog__reasons">
                    {ReportReason::ALL
                        .into_iter()
                        .map(|option| {
                            view! {
                                <label class="report-dialog__reason">
                                    <input
                                        type="radio"
                                        name="report-reason"
                                        value=option.as_str()
                                        prop:checked=move || reason.get() == option
                                        on:change=move |ev| {
                                            if let Some(picked) = ReportReason::from_value(&event_target_value(&ev)) {
                                                reason.set(picked);
                                            }
                                        }
                                    />
                                    <span>{option.label()}</span>
                                </label>
                            }
                        })
                        .collect::<Vec<_>>()}
                </div>
                <div class="dialog__actions">
                    <button type="button" class="btn" on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button type="submit" class="btn btn--danger">
                        "Send report"
                    </button>
                </div>
            </form>
        </div>
    }
}
