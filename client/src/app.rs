//! Root application component with routing and context providers.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use events::ClientEvent;

use crate::pages::{chat::ChatPage, landing::LandingPage};
use crate::state::{channel::ChannelState, session::SessionState, toast::ToastState};

/// Handle to the running channel client's outbound queue.
///
/// Cheap to clone; shared through context as `RwSignal<ChannelSender>`. The
/// default value is disconnected and drops every event.
#[derive(Clone, Debug, Default)]
pub struct ChannelSender {
    #[cfg(feature = "hydrate")]
    tx: Option<futures::channel::mpsc::UnboundedSender<crate::net::channel_client::Outbound>>,
}

impl ChannelSender {
    #[cfg(feature = "hydrate")]
    #[must_use]
    pub fn new(tx: futures::channel::mpsc::UnboundedSender<crate::net::channel_client::Outbound>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Queue an outbound event. Returns `false` when no client is running.
    pub fn send(&self, event: ClientEvent) -> bool {
        #[cfg(feature = "hydrate")]
        {
            use crate::net::channel_client::Outbound;
            self.tx.as_ref().is_some_and(|tx| tx.unbounded_send(Outbound::Event(event)).is_ok())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = event;
            false
        }
    }

    /// Whether a channel client is attached and still accepting events.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        #[cfg(feature = "hydrate")]
        {
            self.tx.as_ref().is_some_and(|tx| !tx.is_closed())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            false
        }
    }

    /// Stop the channel client and detach.
    pub fn close(&mut self) {
        #[cfg(feature = "hydrate")]
        if let Some(tx) = self.tx.take() {
            let _ = tx.unbounded_send(crate::net::channel_client::Outbound::Close);
        }
    }
}

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides all shared state contexts and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = RwSignal::new(SessionState::default());
    let channel = RwSignal::new(ChannelState::default());
    let toasts = RwSignal::new(ToastState::default());
    let sender = RwSignal::new(ChannelSender::default());

    provide_context(session);
    provide_context(channel);
    provide_context(toasts);
    provide_context(sender);

    view! {
        <Stylesheet id="leptos" href="/pkg/strangers.css"/>
        <Title text="Strangers"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=LandingPage/>
                <Route path=StaticSegment("chat") view=ChatPage/>
            </Routes>
        </Router>
    }
}
