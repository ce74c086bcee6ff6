//! Toast helpers with automatic expiry.

use leptos::prelude::{RwSignal, Update};

use crate::state::toast::{ToastKind, ToastState};
#[cfg(feature = "hydrate")]
use crate::state::toast::TOAST_TTL_MS;

/// Show a toast and schedule its dismissal after [`crate::state::toast::TOAST_TTL_MS`].
pub fn show_toast(toasts: RwSignal<ToastState>, kind: ToastKind, text: &str) {
    let mut id = 0;
    toasts.update(|t| id = t.push(kind, text));

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(TOAST_TTL_MS))).await;
        let _ = toasts.try_update(|t| t.dismiss(id));
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = id;
}
