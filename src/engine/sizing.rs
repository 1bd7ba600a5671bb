//! Trade sizing and price assignment — `spec.md` §4.2, grounded on
//! `original_source`'s inline arithmetic in `market_engine::execute`
//! (the `bid_quantity_xts`/`ask_quantity_xts`/"handle rounding errors"
//! block).

use crate::quantities::{Price, Shares};
use crate::state::{Address, MarketTransaction, OrderState};

/// The result of sizing one bid/ask pairing, before settlement mutates
/// balances. Both sides trade at their own limit price; the overlap, if
/// any, becomes `quote_fees`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Sizing {
    pub traded_base: Shares,
    pub bid_paid_quote: Shares,
    pub ask_received_quote: Shares,
    /// `true` when the bid's quote balance is fully consumed by this trade
    /// (`traded_base == bid_qty_base`) — the caller sweeps any residual
    /// quote dust into `bid_paid_quote` in that case.
    pub bid_fully_consumed: bool,
    /// `true` when the ask's base balance is fully consumed
    /// (`traded_base == ask_qty_base`).
    pub ask_fully_consumed: bool,
}

/// Sizes one match between the current resting bid and ask. `bid_price`
/// must be `>= ask_price` (checked by the caller before this is invoked —
/// `spec.md` §4.1 step 1c terminates the pass otherwise).
pub fn size_trade(bid_price: Price, bid: OrderState, ask_price: Price, ask: OrderState) -> Sizing {
    debug_assert!(bid_price >= ask_price);

    let bid_qty_base = bid_price.quote_to_base(bid.balance);
    let ask_qty_base = ask.balance;
    let traded_base = bid_qty_base.min(ask_qty_base);

    let ask_received_quote = ask_price.base_to_quote(traded_base);
    let mut bid_paid_quote = bid_price.base_to_quote(traded_base);

    let bid_fully_consumed = traded_base == bid_qty_base;
    let ask_fully_consumed = traded_base == ask_qty_base;

    if bid_fully_consumed {
        // Sweep any residual quote dust the truncating multiplication left
        // behind, so the bid never ends up with an untradeable remainder —
        // `spec.md` §4.2.
        bid_paid_quote = bid.balance;
    }

    Sizing {
        traded_base,
        bid_paid_quote,
        ask_received_quote,
        bid_fully_consumed,
        ask_fully_consumed,
    }
}

/// Builds the skeleton `MarketTransaction` for a sized match: owners,
/// limit prices, and the quote-fee overlap wedge. `bid_paid`/`ask_paid`/
/// `*_received` legs are filled in by settlement (`engine::settlement`),
/// which may further adjust `bid_paid`/`ask_paid` for the base-side dust
/// sweep described in `spec.md` §4.2.
pub fn build_transaction(
    bid_owner: Address,
    ask_owner: Address,
    bid_price: Price,
    ask_price: Price,
    sizing: Sizing,
) -> MarketTransaction {
    let mut mtrx = MarketTransaction::new(bid_owner, ask_owner, bid_price, ask_price);
    mtrx.bid_paid = sizing.bid_paid_quote;
    mtrx.ask_received = sizing.ask_received_quote;
    mtrx.ask_paid = sizing.traded_base;
    mtrx.bid_received = sizing.traded_base;
    // The overlap wedge: always >= 0 since bid_price >= ask_price.
    mtrx.quote_fees = mtrx.bid_paid - mtrx.ask_received;
    mtrx
}
