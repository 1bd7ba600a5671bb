use borsh::{BorshDeserialize, BorshSerialize};

use crate::quantities::{Price, Shares};
use crate::state::{Address, Side};

/// One matched trade, append-only per block — `spec.md` §3. `Borsh`-derived
/// for audit-log wire compatibility, mirroring the teacher's `events.rs`
/// event structs (`FillEvent` et al.) rather than the ad hoc
/// `FC_CAPTURE_AND_RETHROW` wrapping `original_source` uses for the
/// equivalent `market_transaction`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct MarketTransaction {
    pub bid_owner: Address,
    pub ask_owner: Address,
    pub bid_price: Price,
    pub ask_price: Price,
    pub bid_type: Side,
    pub ask_type: Side,
    pub bid_paid: Shares,
    pub bid_received: Shares,
    pub ask_paid: Shares,
    pub ask_received: Shares,
    pub quote_fees: Shares,
    pub base_fees: Shares,
}

impl MarketTransaction {
    pub fn new(bid_owner: Address, ask_owner: Address, bid_price: Price, ask_price: Price) -> Self {
        MarketTransaction {
            bid_owner,
            ask_owner,
            bid_price,
            ask_price,
            bid_type: Side::Bid,
            ask_type: Side::Ask,
            bid_paid: 0,
            bid_received: 0,
            ask_paid: 0,
            ask_received: 0,
            quote_fees: 0,
            base_fees: 0,
        }
    }

    /// `false` for a transaction whose legs are all zero — the "automatic
    /// market cancel" shape `push_market_transaction` in `original_source`
    /// exempts from the non-negativity/ordering asserts. The active pass
    /// (`spec.md` §4.1) never produces one, but the check is preserved so a
    /// future margin-call/cover pass can push zero-leg transactions without
    /// tripping the invariant checks below.
    pub fn is_real_trade(&self) -> bool {
        self.ask_paid != 0 || self.ask_received != 0 || self.bid_paid != 0 || self.bid_received != 0
    }

    /// Checks the invariants from `spec.md` §3/§8 that apply to every
    /// non-auto-cancel transaction. Returns `Err` with a human-readable
    /// description of the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        if !self.is_real_trade() {
            return Ok(());
        }
        if self.bid_paid < 0 {
            return Err("bid_paid < 0".into());
        }
        if self.ask_paid < 0 {
            return Err("ask_paid < 0".into());
        }
        if self.bid_received < 0 {
            return Err("bid_received < 0".into());
        }
        if self.ask_received < 0 {
            return Err("ask_received < 0".into());
        }
        if self.bid_paid < self.ask_received {
            return Err("bid_paid < ask_received".into());
        }
        if self.ask_paid < self.bid_received {
            return Err("ask_paid < bid_received".into());
        }
        if self.quote_fees < 0 {
            return Err("quote_fees < 0".into());
        }
        if self.base_fees < 0 {
            return Err("base_fees < 0".into());
        }
        Ok(())
    }
}
