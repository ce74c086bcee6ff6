use super::*;

fn offer_with_id(id: u64) -> SessionDescription {
    SessionDescription::offer(format!("v=0\r\no=- {id} 2 IN IP4 127.0.0.1\r\ns=-\r\n"))
}

fn candidate(n: u16) -> IceCandidate {
    IceCandidate {
        candidate: format!("candidate:{n} 1 udp 1 10.0.0.{n} 5000 typ host"),
        sdp_mid: Some("0".to_owned()),
        sdp_m_line_index: Some(0),
        username_fragment: None,
    }
}

// =============================================================
// Collision rule
// =============================================================

#[test]
fn lower_session_id_yields() {
    assert!(local_offer_yields(&offer_with_id(1), &offer_with_id(2)));
    assert!(!local_offer_yields(&offer_with_id(2), &offer_with_id(1)));
}

#[test]
fn collision_rule_is_antisymmetric() {
    let pairs = [(5, 9), (900, 3), (u64::MAX, 0)];
    for (a, b) in pairs {
        let (a, b) = (offer_with_id(a), offer_with_id(b));
        assert_ne!(local_offer_yields(&a, &b), local_offer_yields(&b, &a));
    }
}

#[test]
fn unparsable_ids_fall_back_to_sdp_order() {
    let a = SessionDescription::offer("v=0 a");
    let b = SessionDescription::offer("v=0 b");
    assert!(local_offer_yields(&a, &b));
    assert!(!local_offer_yields(&b, &a));
}

// =============================================================
// Phases
// =============================================================

#[test]
fn offerer_reaches_stable_after_answer() {
    let mut n = Negotiation::default();
    assert!(n.begin_offer());
    assert!(n.offer_sent(offer_with_id(1)).is_none());
    assert_eq!(n.phase, NegotiationPhase::HaveLocalOffer);
    assert!(n.on_remote_answer());
    assert_eq!(n.phase, NegotiationPhase::Stable);
}

#[test]
fn second_begin_offer_is_refused_while_offering() {
    let mut n = Negotiation::default();
    assert!(n.begin_offer());
    assert!(!n.begin_offer());
}

#[test]
fn answerer_accepts_offer_when_idle() {
    let mut n = Negotiation::default();
    assert_eq!(n.on_remote_offer(&offer_with_id(4)), OfferDecision::Accept);
    assert_eq!(n.phase, NegotiationPhase::Answering);
    n.answer_sent();
    assert_eq!(n.phase, NegotiationPhase::Stable);
}

#[test]
fn colliding_offers_resolve_to_one_answerer() {
    let mut low = Negotiation::default();
    let mut high = Negotiation::default();
    let low_offer = offer_with_id(10);
    let high_offer = offer_with_id(20);

    low.begin_offer();
    low.offer_sent(low_offer.clone());
    high.begin_offer();
    high.offer_sent(high_offer.clone());

    assert_eq!(low.on_remote_offer(&high_offer), OfferDecision::RollbackAndAccept);
    assert_eq!(high.on_remote_offer(&low_offer), OfferDecision::Ignore);
    assert_eq!(low.phase, NegotiationPhase::Answering);
    assert_eq!(high.phase, NegotiationPhase::HaveLocalOffer);
}

#[test]
fn offer_during_creation_is_deferred_then_decided() {
    let mut n = Negotiation::default();
    n.begin_offer();
    assert_eq!(n.on_remote_offer(&offer_with_id(50)), OfferDecision::Deferred);

    let (decision, remote) = n.offer_sent(offer_with_id(7)).expect("deferred offer");
    assert_eq!(decision, OfferDecision::RollbackAndAccept);
    assert_eq!(remote, offer_with_id(50));
}

#[test]
fn deferred_offer_is_ignored_when_local_wins() {
    let mut n = Negotiation::default();
    n.begin_offer();
    n.on_remote_offer(&offer_with_id(3));
    let (decision, _) = n.offer_sent(offer_with_id(70)).expect("deferred offer");
    assert_eq!(decision, OfferDecision::Ignore);
    assert_eq!(n.phase, NegotiationPhase::HaveLocalOffer);
}

#[test]
fn stray_answer_is_rejected() {
    let mut n = Negotiation::default();
    assert!(!n.on_remote_answer());
    n.on_remote_offer(&offer_with_id(1));
    assert!(!n.on_remote_answer());
}

#[test]
fn duplicate_offer_while_answering_is_ignored() {
    let mut n = Negotiation::default();
    n.on_remote_offer(&offer_with_id(1));
    assert_eq!(n.on_remote_offer(&offer_with_id(1)), OfferDecision::Ignore);
}

// =============================================================
// ICE buffering
// =============================================================

#[test]
fn ice_is_buffered_until_remote_description_applied() {
    let mut n = Negotiation::default();
    assert!(n.accept_ice(candidate(1)).is_none());
    assert!(n.accept_ice(candidate(2)).is_none());
    assert_eq!(n.pending_ice_len(), 2);

    let flushed = n.remote_applied();
    assert_eq!(flushed, vec![candidate(1), candidate(2)]);
    assert_eq!(n.pending_ice_len(), 0);
    assert_eq!(n.accept_ice(candidate(3)), Some(candidate(3)));
}

#[test]
fn reset_drops_buffered_state() {
    let mut n = Negotiation::default();
    n.begin_offer();
    n.accept_ice(candidate(1));
    n.reset();
    assert_eq!(n.phase, NegotiationPhase::Idle);
    assert_eq!(n.pending_ice_len(), 0);
    assert!(n.begin_offer());
}
