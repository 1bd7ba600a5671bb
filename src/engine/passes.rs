//! The three-pass loop shape — `spec.md` §4.1, preserved as a 3-element
//! sequence rather than collapsed to one active pass, per `spec.md` §9's
//! explicit guidance to keep the structure available for future extension
//! and matching transaction ordering if those passes are ever re-enabled.
//!
//! Grounded on `original_source`'s `MARKET_ENGINE_PASS_PROCESS_MARGIN_CALLS`
//! / `MARKET_ENGINE_PASS_PROCESS_EXPIRED_COVERS` /
//! `MARKET_ENGINE_PASS_PROCESS_ASK_ORDERS` constants and the
//! `for (_current_pass = 0; _current_pass < MARKET_ENGINE_PASS_COUNT; ...)`
//! driver loop.

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Pass {
    /// Reserved; no behavior in this spec (`spec.md` §1 Non-goals: short
    /// positions / margin calls).
    ProcessMarginCalls,
    /// Reserved; no behavior in this spec (Non-goals: cover expiry).
    ProcessExpiredCovers,
    /// The only active pass: match limit bids against limit asks.
    ProcessAskOrders,
}

impl Pass {
    pub const ALL: [Pass; 3] = [
        Pass::ProcessMarginCalls,
        Pass::ProcessExpiredCovers,
        Pass::ProcessAskOrders,
    ];

    /// Whether this pass fetches orders at all. The two reserved slots
    /// fetch nothing and fall through immediately, matching
    /// `get_next_ask`'s `match _current_pass { ProcessAskOrders => ...,
    /// default => FC_ASSERT(false) }` shape generalized to "does nothing"
    /// for the inactive slots instead of asserting.
    pub fn is_active(self) -> bool {
        matches!(self, Pass::ProcessAskOrders)
    }
}
