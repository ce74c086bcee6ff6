//! Offer/answer bookkeeping for one peer connection.
//!
//! DESIGN
//! ======
//! Both paired clients receive `matched` and both start an offer, so offers
//! collide on every call. The collision is settled without extra signaling:
//! each side compares the `o=` session ids of the two offers and the side
//! holding the lower id rolls back and answers. Both sides evaluate the same
//! comparison with the roles swapped, so exactly one of them yields.
//!
//! ICE candidates that arrive before a remote description is applied are
//! buffered and handed back once it is.

#[cfg(test)]
#[path = "negotiation_test.rs"]
mod negotiation_test;

use std::cmp::Ordering;

use events::{IceCandidate, SessionDescription};

/// Where the local side is in the offer/answer exchange.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NegotiationPhase {
    #[default]
    Idle,
    /// `createOffer` is in flight; the local SDP is not known yet.
    Offering,
    /// Local offer applied and sent; waiting for an answer.
    HaveLocalOffer,
    /// A remote offer was accepted; the answer is being produced.
    Answering,
    Stable,
}

/// What to do with an incoming offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OfferDecision {
    Accept,
    /// Roll back the pending local offer, then accept.
    RollbackAndAccept,
    /// Keep the local offer; the remote side will answer it.
    Ignore,
    /// Held until the local offer is known; see [`Negotiation::offer_sent`].
    Deferred,
}

/// `true` when the local offer must give way to the remote one.
#[must_use]
pub fn local_offer_yields(local: &SessionDescription, remote: &SessionDescription) -> bool {
    let ordering = match (local.origin_session_id(), remote.origin_session_id()) {
        (Some(l), Some(r)) if l != r => l.cmp(&r),
        _ => local.sdp.cmp(&remote.sdp),
    };
    ordering != Ordering::Greater
}

#[derive(Clone, Debug, Default)]
pub struct Negotiation {
    pub phase: NegotiationPhase,
    local_offer: Option<SessionDescription>,
    deferred_offer: Option<SessionDescription>,
    remote_ready: bool,
    pending_ice: Vec<IceCandidate>,
}

impl Negotiation {
    /// Begin creating a local offer. Returns `false` if an exchange is
    /// already under way.
    pub fn begin_offer(&mut self) -> bool {
        if !matches!(self.phase, NegotiationPhase::Idle | NegotiationPhase::Stable) {
            return false;
        }
        self.phase = NegotiationPhase::Offering;
        true
    }

    /// The local offer was applied and sent.
    ///
    /// If a remote offer arrived while the local one was being created, it is
    /// re-evaluated now and returned with its decision.
    pub fn offer_sent(&mut self, offer: SessionDescription) -> Option<(OfferDecision, SessionDescription)> {
        if self.phase != NegotiationPhase::Offering {
            return None;
        }
        self.phase = NegotiationPhase::HaveLocalOffer;
        self.local_offer = Some(offer);

        let deferred = self.deferred_offer.take()?;
        let decision = self.on_remote_offer(&deferred);
        Some((decision, deferred))
    }

    pub fn on_remote_offer(&mut self, remote: &SessionDescription) -> OfferDecision {
        match self.phase {
            NegotiationPhase::Idle | NegotiationPhase::Stable => {
                self.phase = NegotiationPhase::Answering;
                self.remote_ready = false;
                OfferDecision::Accept
            }
            NegotiationPhase::Offering => {
                self.deferred_offer = Some(remote.clone());
                OfferDecision::Deferred
            }
            NegotiationPhase::HaveLocalOffer => {
                let yields = self
                    .local_offer
                    .as_ref()
                    .map_or(true, |local| local_offer_yields(local, remote));
                if yields {
                    self.phase = NegotiationPhase::Answering;
                    self.local_offer = None;
                    self.remote_ready = false;
                    OfferDecision::RollbackAndAccept
                } else {
                    OfferDecision::Ignore
                }
            }
            NegotiationPhase::Answering => OfferDecision::Ignore,
        }
    }

    /// A remote answer arrived. Returns `false` for a stray answer.
    pub fn on_remote_answer(&mut self) -> bool {
        if self.phase != NegotiationPhase::HaveLocalOffer {
            return false;
        }
        self.phase = NegotiationPhase::Stable;
        self.local_offer = None;
        true
    }

    pub fn answer_sent(&mut self) {
        if self.phase == NegotiationPhase::Answering {
            self.phase = NegotiationPhase::Stable;
        }
    }

    /// The remote description was applied; returns buffered candidates.
    pub fn remote_applied(&mut self) -> Vec<IceCandidate> {
        self.remote_ready = true;
        std::mem::take(&mut self.pending_ice)
    }

    /// Returns the candidate if it can be applied now, otherwise buffers it.
    pub fn accept_ice(&mut self, candidate: IceCandidate) -> Option<IceCandidate> {
        if self.remote_ready {
            return Some(candidate);
        }
        self.pending_ice.push(candidate);
        None
    }

    #[must_use]
    pub fn pending_ice_len(&self) -> usize {
        self.pending_ice.len()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
