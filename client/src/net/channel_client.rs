//! Real-time channel client for the shared stranger channel.
//!
//! The channel client owns the socket lifecycle: connection, private-channel
//! authorization, subscription, keepalive, reconnection with exponential
//! backoff, inbound dispatch and outbound event delivery. It is the bridge
//! between the channel provider and the Leptos session state.
//!
//! All socket logic is gated behind `#[cfg(feature = "hydrate")]` since it
//! requires a browser environment.
//!
//! DESIGN
//! ======
//! Outbound events are queued on an unbounded channel owned by
//! [`crate::app::ChannelSender`]. Client events are only accepted by the
//! provider after subscription, so the writer holds them in an
//! [`OutboundGate`] until `pusher_internal:subscription_succeeded` arrives.
//!
//! ERROR HANDLING
//! ==============
//! Decode and transport failures are logged and translated into channel
//! state so the UI can show the status while the reconnect loop recovers.
//! Provider errors with a 4000-4099 code stop the loop for good.

#[cfg(test)]
#[path = "channel_client_test.rs"]
mod channel_client_test;

use events::ClientEvent;

/// Message for the channel writer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outbound {
    Event(ClientEvent),
    /// Stop the client; no reconnect follows.
    Close,
}

/// First reconnect delay.
pub const INITIAL_BACKOFF_MS: u32 = 1000;
/// Reconnect delay ceiling.
pub const MAX_BACKOFF_MS: u32 = 10_000;

/// Delay to wait after `current_ms` failed.
#[must_use]
pub fn next_backoff(current_ms: u32) -> u32 {
    current_ms.saturating_mul(2).min(MAX_BACKOFF_MS)
}

/// Holds encoded client events until the subscription is live.
#[derive(Debug, Default)]
pub struct OutboundGate {
    open: bool,
    held: Vec<String>,
}

impl OutboundGate {
    /// Returns the text if it may be written now, otherwise holds it.
    pub fn admit(&mut self, text: String) -> Option<String> {
        if self.open {
            return Some(text);
        }
        self.held.push(text);
        None
    }

    /// Open the gate and drain everything held so far, oldest first.
    pub fn open(&mut self) -> Vec<String> {
        self.open = true;
        std::mem::take(&mut self.held)
    }

    #[must_use]
    pub fn held_len(&self) -> usize {
        self.held.len()
    }
}

/// How one connection attempt ended.
#[cfg(any(test, feature = "hydrate"))]
#[derive(Clone, Debug, PartialEq, Eq)]
enum ConnectionEnd {
    /// A close was requested locally.
    Closed,
    /// The provider refused the connection for good.
    Fatal(String),
    /// The socket dropped; `subscribed` tells whether it ever went live.
    Dropped { subscribed: bool, error: Option<String> },
}

#[cfg(any(test, feature = "hydrate"))]
impl ConnectionEnd {
    fn should_reconnect(&self) -> bool {
        matches!(self, Self::Dropped { .. })
    }
}

#[cfg(feature = "hydrate")]
mod live {
    use std::cell::RefCell;
    use std::rc::Rc;

    use events::{ControlEvent, Incoming};
    use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
    use futures::future::Either;
    use futures::{SinkExt, StreamExt};
    use gloo_net::websocket::Message;
    use gloo_net::websocket::futures::WebSocket;
    use leptos::prelude::{RwSignal, Update, WithUntracked};

    use super::{ConnectionEnd, INITIAL_BACKOFF_MS, OutboundGate, Outbound, next_backoff};
    use crate::net::channel_dispatch::apply_channel_event;
    use crate::net::peer;
    use crate::net::types::ClientConfig;
    use crate::state::channel::ChannelState;
    use crate::state::session::SessionState;
    use crate::state::toast::{ToastKind, ToastState};
    use crate::util::notify::show_toast;

    /// Signals shared by every connection attempt.
    #[derive(Clone, Copy)]
    pub(super) struct Bindings {
        pub session: RwSignal<SessionState>,
        pub channel: RwSignal<ChannelState>,
        pub toasts: RwSignal<ToastState>,
        /// Claim this client holds on `channel`.
        pub generation: u64,
    }

    impl Bindings {
        fn owned(&self) -> bool {
            self.channel.with_untracked(|c| c.owns(self.generation))
        }

        /// Update the channel state unless a newer client has taken over.
        fn update_channel(&self, f: impl FnOnce(&mut ChannelState)) -> bool {
            let mut applied = false;
            self.channel.update(|c| applied = c.update_owned(self.generation, f));
            applied
        }
    }

    /// Writer-side instructions produced by the reader.
    enum Control {
        Text(String),
        Subscribed,
    }

    pub(super) async fn channel_client_loop(
        config: ClientConfig,
        bindings: Bindings,
        rx: UnboundedReceiver<Outbound>,
    ) {
        let rx = Rc::new(RefCell::new(rx));
        let url = events::socket_url(&config.ws_url, &config.app_key);
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            // A released claim means the view that started us is gone.
            if !bindings.update_channel(ChannelState::connecting) {
                leptos::logging::log!("channel client retired");
                break;
            }

            let end = match connect_and_run(&url, &config, bindings, &rx).await {
                Ok(end) => end,
                Err(e) => ConnectionEnd::Dropped { subscribed: false, error: Some(e) },
            };

            match &end {
                // The closer already reset the channel state; a new client may own it now.
                ConnectionEnd::Closed => leptos::logging::log!("channel closed"),
                ConnectionEnd::Fatal(message) => {
                    leptos::logging::warn!("channel refused: {message}");
                    let owned = bindings.update_channel(|c| {
                        c.disconnected(Some(message.clone()));
                        c.fatal = true;
                    });
                    if owned {
                        show_toast(bindings.toasts, ToastKind::Error, "Chat service unavailable");
                        peer::close();
                    }
                }
                ConnectionEnd::Dropped { subscribed, error } => {
                    if let Some(e) = error {
                        leptos::logging::warn!("channel error: {e}");
                    }
                    let owned = bindings.update_channel(|c| c.disconnected(error.clone()));
                    if owned && *subscribed {
                        backoff_ms = INITIAL_BACKOFF_MS;
                        show_toast(bindings.toasts, ToastKind::Warning, "Connection lost, retrying");
                    }
                }
            }
            if !end.should_reconnect() {
                break;
            }

            gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(backoff_ms))).await;
            backoff_ms = next_backoff(backoff_ms);
        }
    }

    /// Connect to the channel host and process messages until disconnect.
    async fn connect_and_run(
        url: &str,
        config: &ClientConfig,
        bindings: Bindings,
        rx: &Rc<RefCell<UnboundedReceiver<Outbound>>>,
    ) -> Result<ConnectionEnd, String> {
        let ws = WebSocket::open(url).map_err(|e| e.to_string())?;
        let (mut ws_write, mut ws_read) = ws.split();
        let (control_tx, mut control_rx) = mpsc::unbounded::<Control>();
        let subscribed = RefCell::new(false);
        let channel_name = config.channel.as_str();

        let mut rx_borrow = rx.borrow_mut();
        let send_task = async {
            let mut gate = OutboundGate::default();
            loop {
                let text = match futures::future::select(control_rx.next(), rx_borrow.next()).await {
                    Either::Left((Some(Control::Text(text)), _)) => text,
                    Either::Left((Some(Control::Subscribed), _)) => {
                        for text in gate.open() {
                            if ws_write.send(Message::Text(text)).await.is_err() {
                                return ConnectionEnd::Dropped { subscribed: true, error: None };
                            }
                        }
                        continue;
                    }
                    Either::Right((Some(Outbound::Event(event)), _)) => {
                        let encoded = events::encode_client_event(channel_name, &event);
                        match gate.admit(encoded) {
                            Some(text) => text,
                            None => continue,
                        }
                    }
                    Either::Right((Some(Outbound::Close) | None, _)) => {
                        let _ = ws_write.close().await;
                        return ConnectionEnd::Closed;
                    }
                    Either::Left((None, _)) => {
                        return ConnectionEnd::Dropped { subscribed: *subscribed.borrow(), error: None };
                    }
                };
                if ws_write.send(Message::Text(text)).await.is_err() {
                    return ConnectionEnd::Dropped { subscribed: *subscribed.borrow(), error: None };
                }
            }
        };

        let recv_task = async {
            while let Some(msg) = ws_read.next().await {
                let text = match msg {
                    Ok(Message::Text(text)) => text,
                    Ok(Message::Bytes(_)) => continue,
                    Err(e) => {
                        return ConnectionEnd::Dropped {
                            subscribed: *subscribed.borrow(),
                            error: Some(e.to_string()),
                        };
                    }
                };
                let incoming = match events::decode_incoming(&text) {
                    Ok(incoming) => incoming,
                    Err(e) => {
                        leptos::logging::warn!("channel decode failed: {e}");
                        continue;
                    }
                };
                if let Some(end) = handle_incoming(incoming, config, bindings, &control_tx, &subscribed).await {
                    return end;
                }
            }
            ConnectionEnd::Dropped { subscribed: *subscribed.borrow(), error: None }
        };

        // Whichever side finishes first ends the connection.
        let end = match futures::future::select(Box::pin(send_task), Box::pin(recv_task)).await {
            Either::Left((end, _)) | Either::Right((end, _)) => end,
        };
        Ok(end)
    }

    /// React to one decoded message. Returns `Some` when the connection must end.
    async fn handle_incoming(
        incoming: Incoming,
        config: &ClientConfig,
        bindings: Bindings,
        control_tx: &UnboundedSender<Control>,
        subscribed: &RefCell<bool>,
    ) -> Option<ConnectionEnd> {
        match incoming {
            Incoming::Control(ControlEvent::ConnectionEstablished { socket_id, .. }) => {
                bindings.update_channel(|c| c.established(socket_id.clone()));
                let auth = if events::requires_auth(&config.channel) {
                    match crate::net::api::authorize_channel(&config.auth_endpoint, &socket_id, &config.channel)
                        .await
                    {
                        Ok(token) => Some(token),
                        Err(e) => return Some(ConnectionEnd::Dropped { subscribed: false, error: Some(e) }),
                    }
                } else {
                    None
                };
                let subscribe = events::subscribe_message(&config.channel, auth.as_deref());
                let _ = control_tx.unbounded_send(Control::Text(subscribe));
            }
            Incoming::Control(ControlEvent::SubscriptionSucceeded { channel }) => {
                leptos::logging::log!("subscribed to {channel}");
                *subscribed.borrow_mut() = true;
                bindings.update_channel(ChannelState::subscribed);
                let _ = control_tx.unbounded_send(Control::Subscribed);
            }
            Incoming::Control(ControlEvent::SubscriptionError { channel, status }) => {
                let message = match status {
                    Some(status) => format!("subscription to {channel} failed: {status}"),
                    None => format!("subscription to {channel} failed"),
                };
                return Some(ConnectionEnd::Dropped { subscribed: false, error: Some(message) });
            }
            Incoming::Control(ControlEvent::Ping) => {
                let _ = control_tx.unbounded_send(Control::Text(events::pong_message()));
            }
            Incoming::Control(ControlEvent::Pong) => {}
            Incoming::Control(error @ ControlEvent::Error { .. }) => {
                let fatal = error.is_fatal();
                if let ControlEvent::Error { message, code } = error {
                    let described = match code {
                        Some(code) => format!("{message} ({code})"),
                        None => message,
                    };
                    if fatal {
                        return Some(ConnectionEnd::Fatal(described));
                    }
                    leptos::logging::warn!("channel provider error: {described}");
                }
            }
            Incoming::Channel { channel, event } => {
                if channel.as_deref().is_some_and(|name| name != config.channel) || !bindings.owned() {
                    return None;
                }
                let mut actions = Vec::new();
                bindings.session.update(|s| actions = apply_channel_event(s, event));
                for action in actions {
                    peer::run(action);
                }
            }
            Incoming::Ignored(name) => {
                leptos::logging::log!("ignoring channel event {name}");
            }
        }
        None
    }
}

/// Spawn the channel client lifecycle as a local async task.
///
/// Returns the outbound queue; sending [`Outbound::Close`] (or dropping every
/// sender) stops the client.
#[cfg(feature = "hydrate")]
pub fn spawn_channel_client(
    config: crate::net::types::ClientConfig,
    session: leptos::prelude::RwSignal<crate::state::session::SessionState>,
    channel: leptos::prelude::RwSignal<crate::state::channel::ChannelState>,
    toasts: leptos::prelude::RwSignal<crate::state::toast::ToastState>,
    generation: u64,
) -> futures::channel::mpsc::UnboundedSender<Outbound> {
    let (tx, rx) = futures::channel::mpsc::unbounded::<Outbound>();
    crate::net::peer::configure(config.effective_ice_servers(), tx.clone(), toasts);
    let bindings = live::Bindings { session, channel, toasts, generation };
    leptos::task::spawn_local(live::channel_client_loop(config, bindings, rx));
    tx
}

/// Start the channel client unless one already owns the channel state.
///
/// Claims `channel` and returns the claim's generation, or `None` when
/// another client holds it or the provider refused the app. Fetches
/// [`crate::net::types::ClientConfig`] from the server first; the resulting
/// sender is stored in `sender` for the pages to use. Releasing the claim
/// with [`crate::state::channel::ChannelState::release`] retires the client.
pub fn establish_channel(
    sender: leptos::prelude::RwSignal<crate::app::ChannelSender>,
    session: leptos::prelude::RwSignal<crate::state::session::SessionState>,
    channel: leptos::prelude::RwSignal<crate::state::channel::ChannelState>,
    toasts: leptos::prelude::RwSignal<crate::state::toast::ToastState>,
) -> Option<u64> {
    use crate::state::channel::ChannelState;
    #[cfg(feature = "hydrate")]
    use leptos::prelude::{Set, WithUntracked};
    use leptos::prelude::{GetUntracked, Update};

    if sender.get_untracked().is_attached() {
        return None;
    }
    let generation = channel.try_update(ChannelState::claim).flatten()?;

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        let config = crate::net::api::fetch_client_config().await;
        // The chat view may have been torn down while the config was in flight.
        if !channel.with_untracked(|c| c.owns(generation)) {
            return;
        }
        match config {
            Ok(config) => {
                let tx = spawn_channel_client(config, session, channel, toasts, generation);
                sender.set(crate::app::ChannelSender::new(tx));
            }
            Err(e) => {
                leptos::logging::warn!("channel config unavailable: {e}");
                channel.update(|c: &mut ChannelState| c.abandon(generation, e));
                crate::util::notify::show_toast(
                    toasts,
                    crate::state::toast::ToastKind::Error,
                    "Chat service unavailable",
                );
            }
        }
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = (session, toasts);
    Some(generation)
}
