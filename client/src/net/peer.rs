//! Browser peer connection wrapper for video chat.
//!
//! SYSTEM CONTEXT
//! ==============
//! The channel client turns inbound events into [`CallAction`]s; this module
//! executes them against a single `RTCPeerConnection`: local media capture,
//! connection creation, track attachment, offer/answer/ICE relay over the
//! channel and remote stream attachment. Offer/answer ordering decisions are
//! made by [`Negotiation`]; this module only performs the browser calls.
//!
//! DESIGN
//! ======
//! The connection, local stream and event callbacks live in a thread-local
//! slot on the single WASM thread. Every close bumps a generation counter so
//! async steps still in flight from a closed call drop their results.
//!
//! ERROR HANDLING
//! ==============
//! Browser promise rejections are logged; a failed camera request raises a
//! toast and leaves the call unestablished.

#[cfg(test)]
#[path = "peer_test.rs"]
mod peer_test;

#[cfg(feature = "hydrate")]
use crate::net::channel_dispatch::CallAction;
#[cfg(feature = "hydrate")]
use crate::net::negotiation::{Negotiation, OfferDecision};
use events::{ClientEvent, IceCandidate};

/// DOM id of the `<video>` showing the local camera.
pub const LOCAL_VIDEO_ID: &str = "local-video";
/// DOM id of the `<video>` showing the stranger.
pub const REMOTE_VIDEO_ID: &str = "remote-video";

/// Build a relayable candidate from the browser's fields.
///
/// Returns `None` for the end-of-candidates marker, which is not relayed.
#[must_use]
pub fn relayable_candidate(
    candidate: String,
    sdp_mid: Option<String>,
    sdp_m_line_index: Option<u16>,
    username_fragment: Option<String>,
) -> Option<IceCandidate> {
    let username_fragment = username_fragment.filter(|u| !u.is_empty());
    let candidate = IceCandidate { candidate, sdp_mid, sdp_m_line_index, username_fragment };
    (!candidate.is_end_of_candidates()).then_some(candidate)
}

/// Hand a signaling event to `push`, warning when it is refused.
///
/// `push` is `None` when no channel client has been configured.
pub fn relay_signal<E>(event: ClientEvent, push: Option<impl FnOnce(ClientEvent) -> Result<(), E>>) -> bool {
    let name = event.name();
    let delivered = push.is_some_and(|push| push(event).is_ok());
    if !delivered {
        leptos::logging::warn!("signaling dropped ({name}): channel not running");
    }
    delivered
}

#[cfg(feature = "hydrate")]
mod browser {
    use std::cell::RefCell;

    use events::{ClientEvent, IceCandidate, SdpType, SessionDescription};
    use js_sys::Reflect;
    use futures::channel::mpsc::UnboundedSender;
    use leptos::prelude::RwSignal;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::{Closure, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        MediaStream, MediaStreamConstraints, MediaStreamTrack, RtcConfiguration, RtcIceCandidateInit, RtcIceServer,
        RtcPeerConnection, RtcPeerConnectionIceEvent, RtcSdpType, RtcSessionDescriptionInit, RtcTrackEvent,
    };

    use super::{LOCAL_VIDEO_ID, Negotiation, REMOTE_VIDEO_ID, relay_signal, relayable_candidate};
    use crate::net::channel_client::Outbound;
    use crate::net::types::IceServer;
    use crate::state::toast::{ToastKind, ToastState};
    use crate::util::notify::show_toast;

    pub(super) struct Settings {
        pub ice_servers: Vec<IceServer>,
        pub tx: UnboundedSender<Outbound>,
        pub toasts: RwSignal<ToastState>,
    }

    #[derive(Default)]
    pub(super) struct PeerLink {
        pub negotiation: Negotiation,
        pub generation: u64,
        pc: Option<RtcPeerConnection>,
        local: Option<MediaStream>,
        on_ice: Option<Closure<dyn FnMut(RtcPeerConnectionIceEvent)>>,
        on_track: Option<Closure<dyn FnMut(RtcTrackEvent)>>,
    }

    thread_local! {
        pub(super) static SETTINGS: RefCell<Option<Settings>> = const { RefCell::new(None) };
        pub(super) static LINK: RefCell<PeerLink> = RefCell::new(PeerLink::default());
    }

    pub(super) fn send(event: ClientEvent) {
        SETTINGS.with(|s| {
            let slot = s.borrow();
            let push = slot
                .as_ref()
                .map(|settings| |event: ClientEvent| settings.tx.unbounded_send(Outbound::Event(event)));
            relay_signal(event, push);
        });
    }

    pub(super) fn toast(kind: ToastKind, text: &str) {
        let toasts = SETTINGS.with(|s| s.borrow().as_ref().map(|settings| settings.toasts));
        if let Some(toasts) = toasts {
            show_toast(toasts, kind, text);
        }
    }

    pub(super) fn generation() -> u64 {
        LINK.with(|l| l.borrow().generation)
    }

    fn is_current(generation: u64) -> bool {
        self::generation() == generation
    }

    fn js_error(err: &JsValue) -> String {
        err.as_string().unwrap_or_else(|| format!("{err:?}"))
    }

    fn video_element(id: &str) -> Option<web_sys::HtmlVideoElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id(id)?
            .dyn_into::<web_sys::HtmlVideoElement>()
            .ok()
    }

    async fn capture_local_media() -> Result<MediaStream, String> {
        let window = web_sys::window().ok_or("no window")?;
        let devices = window.navigator().media_devices().map_err(|e| js_error(&e))?;
        let constraints = MediaStreamConstraints::new();
        constraints.set_audio(&JsValue::TRUE);
        constraints.set_video(&JsValue::TRUE);
        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|e| js_error(&e))?;
        let stream = JsFuture::from(promise).await.map_err(|e| js_error(&e))?;
        Ok(MediaStream::from(stream))
    }

    fn rtc_configuration(ice_servers: &[IceServer]) -> RtcConfiguration {
        let servers = js_sys::Array::new();
        for server in ice_servers {
            let entry = RtcIceServer::new();
            let urls = server.urls.iter().map(|u| JsValue::from_str(u)).collect::<js_sys::Array>();
            entry.set_urls(&urls);
            if let Some(username) = &server.username {
                entry.set_username(username);
            }
            if let Some(credential) = &server.credential {
                entry.set_credential(credential);
            }
            servers.push(&entry);
        }
        let config = RtcConfiguration::new();
        config.set_ice_servers(&servers);
        config
    }

    /// Return the live connection, creating it (and capturing media) once.
    pub(super) async fn ensure_connection(generation: u64) -> Result<RtcPeerConnection, String> {
        if let Some(pc) = LINK.with(|l| l.borrow().pc.clone()) {
            return Ok(pc);
        }

        let stream = match capture_local_media().await {
            Ok(stream) => stream,
            Err(e) => {
                toast(ToastKind::Error, "Camera unavailable");
                return Err(format!("camera unavailable: {e}"));
            }
        };
        if !is_current(generation) {
            stop_tracks(&stream);
            return Err("call closed while capturing media".to_owned());
        }
        // A concurrent step may have created the connection while we awaited.
        if let Some(pc) = LINK.with(|l| l.borrow().pc.clone()) {
            stop_tracks(&stream);
            return Ok(pc);
        }

        let ice_servers = SETTINGS.with(|s| s.borrow().as_ref().map(|s| s.ice_servers.clone())).unwrap_or_default();
        let pc = RtcPeerConnection::new_with_configuration(&rtc_configuration(&ice_servers)).map_err(|e| js_error(&e))?;

        for track in stream.get_tracks().iter() {
            let track = MediaStreamTrack::from(track);
            pc.add_track_0(&track, &stream);
        }
        if let Some(video) = video_element(LOCAL_VIDEO_ID) {
            video.set_muted(true);
            video.set_src_object(Some(&stream));
        }

        let on_ice = Closure::wrap(Box::new(move |ev: RtcPeerConnectionIceEvent| {
            let Some(c) = ev.candidate() else {
                return;
            };
            // Older web-sys bindings lack a getter for usernameFragment.
            let ufrag = Reflect::get(&c, &JsValue::from_str("usernameFragment")).ok().and_then(|v| v.as_string());
            if let Some(candidate) = relayable_candidate(c.candidate(), c.sdp_mid(), c.sdp_m_line_index(), ufrag) {
                send(ClientEvent::Ice(candidate));
            }
        }) as Box<dyn FnMut(RtcPeerConnectionIceEvent)>);
        pc.set_onicecandidate(Some(on_ice.as_ref().unchecked_ref()));

        let on_track = Closure::wrap(Box::new(move |ev: RtcTrackEvent| {
            let Some(stream) = ev.streams().get(0).dyn_into::<MediaStream>().ok() else {
                return;
            };
            if let Some(video) = video_element(REMOTE_VIDEO_ID) {
                video.set_src_object(Some(&stream));
            }
        }) as Box<dyn FnMut(RtcTrackEvent)>);
        pc.set_ontrack(Some(on_track.as_ref().unchecked_ref()));

        LINK.with(|l| {
            let mut link = l.borrow_mut();
            link.pc = Some(pc.clone());
            link.local = Some(stream);
            link.on_ice = Some(on_ice);
            link.on_track = Some(on_track);
        });
        Ok(pc)
    }

    fn stop_tracks(stream: &MediaStream) {
        for track in stream.get_tracks().iter() {
            MediaStreamTrack::from(track).stop();
        }
    }

    fn description_init(desc: &SessionDescription) -> RtcSessionDescriptionInit {
        let kind = match desc.kind {
            SdpType::Offer => RtcSdpType::Offer,
            SdpType::Answer => RtcSdpType::Answer,
            SdpType::Pranswer => RtcSdpType::Pranswer,
            SdpType::Rollback => RtcSdpType::Rollback,
        };
        let init = RtcSessionDescriptionInit::new(kind);
        init.set_sdp(&desc.sdp);
        init
    }

    fn sdp_of(value: &JsValue) -> Result<String, String> {
        js_sys::Reflect::get(value, &JsValue::from_str("sdp"))
            .map_err(|e| js_error(&e))?
            .as_string()
            .ok_or_else(|| "description without sdp".to_owned())
    }

    pub(super) async fn create_local(pc: &RtcPeerConnection, kind: SdpType) -> Result<SessionDescription, String> {
        let promise = if kind == SdpType::Offer { pc.create_offer() } else { pc.create_answer() };
        let created = JsFuture::from(promise).await.map_err(|e| js_error(&e))?;
        let desc = SessionDescription { kind, sdp: sdp_of(&created)? };
        JsFuture::from(pc.set_local_description(&description_init(&desc)))
            .await
            .map_err(|e| js_error(&e))?;
        Ok(desc)
    }

    pub(super) async fn rollback(pc: &RtcPeerConnection) -> Result<(), String> {
        let init = RtcSessionDescriptionInit::new(RtcSdpType::Rollback);
        JsFuture::from(pc.set_local_description(&init)).await.map_err(|e| js_error(&e))?;
        Ok(())
    }

    pub(super) async fn apply_remote(pc: &RtcPeerConnection, desc: &SessionDescription) -> Result<(), String> {
        JsFuture::from(pc.set_remote_description(&description_init(desc)))
            .await
            .map_err(|e| js_error(&e))?;
        Ok(())
    }

    pub(super) async fn add_candidate(pc: &RtcPeerConnection, candidate: &IceCandidate) -> Result<(), String> {
        let init = RtcIceCandidateInit::new(&candidate.candidate);
        init.set_sdp_mid(candidate.sdp_mid.as_deref());
        init.set_sdp_m_line_index(candidate.sdp_m_line_index);
        if let Some(fragment) = candidate.username_fragment.as_deref() {
            init.set_username_fragment(Some(fragment));
        }
        JsFuture::from(pc.add_ice_candidate_with_opt_rtc_ice_candidate_init(Some(&init)))
            .await
            .map_err(|e| js_error(&e))?;
        Ok(())
    }

    pub(super) fn current_connection() -> Option<RtcPeerConnection> {
        LINK.with(|l| l.borrow().pc.clone())
    }

    /// Tear down the call and start a new generation.
    pub(super) fn close_link() {
        let link = LINK.with(|l| {
            let mut slot = l.borrow_mut();
            let generation = slot.generation.wrapping_add(1);
            std::mem::replace(&mut *slot, PeerLink { generation, ..PeerLink::default() })
        });
        if let Some(pc) = &link.pc {
            pc.set_onicecandidate(None);
            pc.set_ontrack(None);
            pc.close();
        }
        if let Some(stream) = &link.local {
            stop_tracks(stream);
        }
        for id in [LOCAL_VIDEO_ID, REMOTE_VIDEO_ID] {
            if let Some(video) = video_element(id) {
                video.set_src_object(None);
            }
        }
    }
}

/// Register the ICE servers and outbound queue used by future calls.
#[cfg(feature = "hydrate")]
pub fn configure(
    ice_servers: Vec<crate::net::types::IceServer>,
    tx: futures::channel::mpsc::UnboundedSender<crate::net::channel_client::Outbound>,
    toasts: leptos::prelude::RwSignal<crate::state::toast::ToastState>,
) {
    browser::SETTINGS.with(|s| *s.borrow_mut() = Some(browser::Settings { ice_servers, tx, toasts }));
}

/// Execute one call action.
#[cfg(feature = "hydrate")]
pub fn run(action: CallAction) {
    match action {
        CallAction::StartOffer => {
            if browser::LINK.with(|l| l.borrow_mut().negotiation.begin_offer()) {
                leptos::task::spawn_local(start_offer(browser::generation()));
            }
        }
        CallAction::AcceptOffer(offer) => {
            let decision = browser::LINK.with(|l| l.borrow_mut().negotiation.on_remote_offer(&offer));
            accept_decided(decision, offer);
        }
        CallAction::ApplyAnswer(answer) => {
            if browser::LINK.with(|l| l.borrow_mut().negotiation.on_remote_answer()) {
                leptos::task::spawn_local(apply_answer(browser::generation(), answer));
            } else {
                leptos::logging::warn!("ignoring answer without a pending offer");
            }
        }
        CallAction::AddIce(candidate) => {
            let ready = browser::LINK.with(|l| l.borrow_mut().negotiation.accept_ice(candidate));
            if let Some(candidate) = ready {
                leptos::task::spawn_local(add_candidates(browser::generation(), vec![candidate]));
            }
        }
        CallAction::Close => close(),
    }
}

/// Close the connection, stop local tracks and detach both videos.
#[cfg(feature = "hydrate")]
pub fn close() {
    browser::close_link();
}

#[cfg(not(feature = "hydrate"))]
pub fn close() {}

#[cfg(feature = "hydrate")]
fn accept_decided(decision: OfferDecision, offer: events::SessionDescription) {
    let generation = browser::generation();
    match decision {
        OfferDecision::Accept => leptos::task::spawn_local(accept_offer(generation, offer, false)),
        OfferDecision::RollbackAndAccept => leptos::task::spawn_local(accept_offer(generation, offer, true)),
        OfferDecision::Ignore => leptos::logging::log!("keeping local offer over remote offer"),
        OfferDecision::Deferred => {}
    }
}

#[cfg(feature = "hydrate")]
async fn start_offer(generation: u64) {
    let result = async {
        let pc = browser::ensure_connection(generation).await?;
        browser::create_local(&pc, events::SdpType::Offer).await
    }
    .await;
    if browser::generation() != generation {
        return;
    }
    match result {
        Ok(offer) => {
            browser::send(events::ClientEvent::Offer(offer.clone()));
            let deferred = browser::LINK.with(|l| l.borrow_mut().negotiation.offer_sent(offer));
            if let Some((decision, remote)) = deferred {
                accept_decided(decision, remote);
            }
        }
        Err(e) => {
            leptos::logging::warn!("offer failed: {e}");
            browser::LINK.with(|l| l.borrow_mut().negotiation.reset());
        }
    }
}

#[cfg(feature = "hydrate")]
async fn accept_offer(generation: u64, offer: events::SessionDescription, rollback: bool) {
    let result = async {
        let pc = browser::ensure_connection(generation).await?;
        if rollback {
            browser::rollback(&pc).await?;
        }
        browser::apply_remote(&pc, &offer).await?;
        let answer = browser::create_local(&pc, events::SdpType::Answer).await?;
        Ok::<_, String>(answer)
    }
    .await;
    if browser::generation() != generation {
        return;
    }
    match result {
        Ok(answer) => {
            browser::send(events::ClientEvent::Answer(answer));
            let pending = browser::LINK.with(|l| {
                let mut link = l.borrow_mut();
                link.negotiation.answer_sent();
                link.negotiation.remote_applied()
            });
            add_candidates(generation, pending).await;
        }
        Err(e) => leptos::logging::warn!("answer failed: {e}"),
    }
}

#[cfg(feature = "hydrate")]
async fn apply_answer(generation: u64, answer: events::SessionDescription) {
    let Some(pc) = browser::current_connection() else {
        return;
    };
    if let Err(e) = browser::apply_remote(&pc, &answer).await {
        leptos::logging::warn!("applying answer failed: {e}");
        return;
    }
    if browser::generation() != generation {
        return;
    }
    let pending = browser::LINK.with(|l| l.borrow_mut().negotiation.remote_applied());
    add_candidates(generation, pending).await;
}

#[cfg(feature = "hydrate")]
async fn add_candidates(generation: u64, candidates: Vec<IceCandidate>) {
    let Some(pc) = browser::current_connection() else {
        return;
    };
    for candidate in candidates {
        if browser::generation() != generation {
            return;
        }
        if let Err(e) = browser::add_candidate(&pc, &candidate).await {
            leptos::logging::warn!("adding ICE candidate failed: {e}");
        }
    }
}
