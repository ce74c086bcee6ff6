//! # client
//!
//! Leptos + WASM front-end for anonymous one-to-one stranger chat.
//!
//! This crate contains the landing and chat pages, their components, the
//! session state, the real-time channel client and the browser peer
//! connection wrapper. The server crate renders it with SSR; the `hydrate`
//! feature builds the browser bundle.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install panic and log hooks, then hydrate the shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
