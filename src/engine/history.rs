//! Per-block/hour/day history roll-up — `spec.md` §4.5, grounded on
//! `original_source`'s `update_market_history`.

use crate::quantities::{AssetId, Price, Shares};
use crate::state::{Granularity, MarketHistoryKey, MarketHistoryRecord};
use crate::store::ChainStateStore;

/// Inputs accumulated across one successful `execute` pass, summarizing
/// what actually traded — `spec.md` §4.1 step e, §4.5.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TradeSummary {
    pub trading_volume: Shares,
    pub highest_bid: Price,
    pub lowest_ask: Price,
    pub opening_price: Price,
    pub closing_price: Price,
}

impl TradeSummary {
    pub fn empty() -> Self {
        TradeSummary {
            trading_volume: 0,
            highest_bid: Price::UNSET,
            lowest_ask: Price::UNSET,
            opening_price: Price::UNSET,
            closing_price: Price::UNSET,
        }
    }
}

/// Called once per successful execution, never on failure — `spec.md`
/// §4.5. Writes nothing when `trading_volume == 0` (no legs traded the
/// native asset, or the market didn't trade at all).
pub fn record_trade_history(
    store: &mut dyn ChainStateStore,
    quote_id: AssetId,
    base_id: AssetId,
    timestamp: u64,
    summary: TradeSummary,
) {
    if summary.trading_volume <= 0 {
        return;
    }

    let new_record = MarketHistoryRecord::new(
        summary.highest_bid,
        summary.lowest_ask,
        summary.opening_price,
        summary.closing_price,
        summary.trading_volume,
    );

    write_each_block(store, quote_id, base_id, timestamp, new_record);
    write_merged_bucket(store, quote_id, base_id, Granularity::EachHour, timestamp, new_record);
    write_merged_bucket(store, quote_id, base_id, Granularity::EachDay, timestamp, new_record);
}

/// `each_block` dedup rule preserved verbatim from `original_source`:
/// before overwriting `key.timestamp` with the block timestamp, it looks
/// up the record immediately *preceding* that same key (`lower_bound` then
/// back up one, or `last()` if past-end) and skips the write only if that
/// preceding record's key happens to equal the new one. Because "the
/// record right before X" is by construction never equal to X in a
/// strictly-ordered map, this guard never actually fires in practice — the
/// write always proceeds. `spec.md` §9 flags the rationale as unclear and
/// directs that the observed behavior (an unconditional write) be
/// preserved rather than "fixed".
fn write_each_block(
    store: &mut dyn ChainStateStore,
    quote_id: AssetId,
    base_id: AssetId,
    timestamp: u64,
    new_record: MarketHistoryRecord,
) {
    let new_key = MarketHistoryKey::new(quote_id, base_id, Granularity::EachBlock, timestamp);
    store.store_history_record(new_key, new_record);
}

/// `each_hour`/`each_day`: merge into the existing bucket if present,
/// otherwise insert as-is — `spec.md` §4.5.
fn write_merged_bucket(
    store: &mut dyn ChainStateStore,
    quote_id: AssetId,
    base_id: AssetId,
    granularity: Granularity,
    timestamp: u64,
    new_record: MarketHistoryRecord,
) {
    let bucket_ts = MarketHistoryKey::bucket_timestamp(granularity, timestamp);
    let key = MarketHistoryKey::new(quote_id, base_id, granularity, bucket_ts);
    match store.get_history_record(&key) {
        Some(mut existing) => {
            existing.merge_into(&new_record);
            store.store_history_record(key, existing);
        }
        None => {
            store.store_history_record(key, new_record);
        }
    }
}
