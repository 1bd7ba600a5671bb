//! The matching engine driver — `spec.md` §4.1, §4.6. Grounded on
//! `original_source`'s `market_engine::execute`, generalized off the
//! Solana account model the teacher otherwise wraps this kind of loop in
//! (`state/markets/fifo.rs`'s `match_order`).

pub mod book;
pub mod history;
pub mod passes;
pub mod settlement;
pub mod sizing;

use crate::engine_warn;
use crate::error::EngineError;
use crate::quantities::{AssetId, Shares};
use crate::state::{AssetRecord, MarketStatus, MarketTransaction};
use crate::store::{ChainStateStore, PendingOverlay};

use book::BookCursor;
use history::{record_trade_history, TradeSummary};
use passes::Pass;

/// Owns the output of the most recent `execute` call. One instance can be
/// reused across many markets/blocks — `spec.md` §5's single-threaded,
/// one-market-at-a-time scheduling model.
#[derive(Debug, Default)]
pub struct MatchingEngine {
    transactions: Vec<MarketTransaction>,
}

impl MatchingEngine {
    pub fn new() -> Self {
        MatchingEngine::default()
    }

    /// The matched transactions emitted by the most recent `execute` call.
    /// Empty after a failed call — nothing is considered emitted unless
    /// the overlay it came from was actually merged.
    pub fn transactions(&self) -> &[MarketTransaction] {
        &self.transactions
    }

    /// `spec.md` §4.1's `execute(quote_id, base_id, block_timestamp) ->
    /// bool`. `store` is the *parent* (committed) chain state; internally
    /// a `PendingOverlay` absorbs every mutation and is merged into it only
    /// on success.
    pub fn execute(&mut self, store: &mut dyn ChainStateStore, quote_id: AssetId, base_id: AssetId, block_timestamp: u64) -> bool {
        match run_market(store, quote_id, base_id, block_timestamp) {
            Ok(transactions) => {
                self.transactions = transactions;
                true
            }
            Err(err) => {
                engine_warn!("error executing market {:?}/{:?}: {}", quote_id, base_id, err);
                self.transactions.clear();
                let mut status = store
                    .get_market_status(quote_id, base_id)
                    .unwrap_or_else(|| MarketStatus::new(quote_id, base_id));
                status.last_error = Some(err);
                store.store_market_status(status);
                false
            }
        }
    }
}

/// The body of `execute`, wrapped in `?` throughout so the caller's tail
/// `match` implements the discard/restore/store dance of `spec.md` §4.6 in
/// one place — mirroring the `try { ... } catch (const fc::exception& e)`
/// shape in `original_source`.
fn run_market(
    store: &mut dyn ChainStateStore,
    quote_id: AssetId,
    base_id: AssetId,
    block_timestamp: u64,
) -> Result<Vec<MarketTransaction>, EngineError> {
    let quote_asset = store
        .get_asset_record(quote_id)
        .ok_or(EngineError::InvalidMarket(quote_id))?;
    let base_asset = store
        .get_asset_record(base_id)
        .ok_or(EngineError::InvalidMarket(base_id))?;

    if quote_asset.halted_markets {
        return Err(EngineError::InvalidMarket(quote_id));
    }
    if base_asset.halted_markets {
        return Err(EngineError::InvalidMarket(base_id));
    }

    let mut overlay = PendingOverlay::new(store, block_timestamp);

    let mut transactions = Vec::new();
    let mut quote_fees_total: Shares = 0;
    let mut base_fees_total: Shares = 0;
    let mut summary = TradeSummary::empty();

    for pass in Pass::ALL {
        if !pass.is_active() {
            continue;
        }
        run_pass(
            &mut overlay,
            quote_id,
            base_id,
            &quote_asset,
            &base_asset,
            &mut transactions,
            &mut quote_fees_total,
            &mut base_fees_total,
            &mut summary,
        )?;
    }

    let mut quote_asset = quote_asset;
    let mut base_asset = base_asset;
    quote_asset.collected_fees += quote_fees_total;
    base_asset.collected_fees += base_fees_total;
    overlay.store_asset_record(quote_asset);
    overlay.store_asset_record(base_asset);

    let mut status = overlay
        .get_market_status(quote_id, base_id)
        .unwrap_or_else(|| MarketStatus::new(quote_id, base_id));
    status.last_error = None;
    overlay.store_market_status(status);

    record_trade_history(&mut overlay, quote_id, base_id, block_timestamp, summary);

    overlay.apply_changes();
    Ok(transactions)
}

/// One pass of the match loop — `spec.md` §4.1's numbered algorithm.
#[allow(clippy::too_many_arguments)]
fn run_pass(
    overlay: &mut PendingOverlay,
    quote_id: AssetId,
    base_id: AssetId,
    quote_asset: &AssetRecord,
    base_asset: &AssetRecord,
    transactions: &mut Vec<MarketTransaction>,
    quote_fees_total: &mut Shares,
    base_fees_total: &mut Shares,
    summary: &mut TradeSummary,
) -> Result<(), EngineError> {
    let mut bid_cursor = BookCursor::for_bids(overlay, quote_id, base_id);
    let mut ask_cursor = BookCursor::for_asks(overlay, quote_id, base_id);

    let mut current_bid = None;
    let mut current_ask = None;
    let mut last_filled: i64 = -1;
    let mut filled: i64 = 0;

    loop {
        if current_bid.map_or(true, |(_, s): (_, crate::state::OrderState)| s.balance <= 0) {
            match bid_cursor.next_live(overlay, |s, k| s.get_bid_order(k)) {
                Some(pair) => {
                    bid_cursor.advance();
                    current_bid = Some(pair);
                    filled += 1;
                }
                None => {
                    engine_warn!("market {:?}/{:?} terminating pass: no more bids", quote_id, base_id);
                    break;
                }
            }
        }
        if current_ask.map_or(true, |(_, s): (_, crate::state::OrderState)| s.balance <= 0) {
            match ask_cursor.next_live(overlay, |s, k| s.get_ask_order(k)) {
                Some(pair) => {
                    ask_cursor.advance();
                    current_ask = Some(pair);
                    filled += 1;
                }
                None => {
                    engine_warn!("market {:?}/{:?} terminating pass: no more asks", quote_id, base_id);
                    break;
                }
            }
        }

        let (bid_key, bid_state) = current_bid.expect("just populated above");
        let (ask_key, ask_state) = current_ask.expect("just populated above");

        if filled == last_filled {
            return Err(EngineError::MatchingLoopStuck);
        }
        last_filled = filled;

        if bid_key.price < ask_key.price {
            break;
        }

        let sizing = sizing::size_trade(bid_key.price, bid_state, ask_key.price, ask_state);
        let mut mtrx = sizing::build_transaction(bid_key.owner, ask_key.owner, bid_key.price, ask_key.price, sizing);

        let new_bid_state = settlement::pay_current_bid(
            overlay,
            &mut mtrx,
            bid_key,
            bid_state,
            bid_key.price,
            base_asset,
            base_id,
        )?;
        let new_ask_state = settlement::pay_current_ask(
            overlay,
            &mut mtrx,
            ask_key,
            ask_state,
            ask_key.price,
            quote_asset,
            quote_id,
        )?;

        mtrx.check_invariants().map_err(EngineError::InvariantViolation)?;

        current_bid = Some((bid_key, new_bid_state));
        current_ask = Some((ask_key, new_ask_state));

        *quote_fees_total += mtrx.quote_fees;
        *base_fees_total += mtrx.base_fees;

        // Trading volume only counts legs denominated in the native asset
        // — preserved as-is per `spec.md` §9's open question.
        if quote_id.is_native() {
            summary.trading_volume += mtrx.ask_received;
        } else if base_id.is_native() {
            summary.trading_volume += mtrx.bid_received;
        }

        if summary.opening_price.is_unset() {
            summary.opening_price = mtrx.bid_price;
        }
        summary.closing_price = mtrx.bid_price;
        if summary.highest_bid.is_unset() || summary.highest_bid < mtrx.bid_price {
            summary.highest_bid = mtrx.bid_price;
        }
        if summary.lowest_ask.is_unset() || summary.lowest_ask > mtrx.ask_price {
            summary.lowest_ask = mtrx.ask_price;
        }

        transactions.push(mtrx);
    }

    Ok(())
}
