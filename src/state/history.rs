use borsh::{BorshDeserialize, BorshSerialize};

use crate::quantities::{AssetId, Price, Shares};

/// Granularity bucket a `MarketHistoryRecord` is rolled up at — `spec.md`
/// §3. Grounded on `market_history_key::each_block`/`each_hour`/`each_day`
/// in `original_source`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, BorshSerialize, BorshDeserialize)]
pub enum Granularity {
    EachBlock,
    EachHour,
    EachDay,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, BorshSerialize, BorshDeserialize)]
pub struct MarketHistoryKey {
    pub quote_id: AssetId,
    pub base_id: AssetId,
    pub granularity: Granularity,
    pub timestamp: u64,
}

impl MarketHistoryKey {
    pub fn new(quote_id: AssetId, base_id: AssetId, granularity: Granularity, timestamp: u64) -> Self {
        MarketHistoryKey {
            quote_id,
            base_id,
            granularity,
            timestamp,
        }
    }

    /// Floors `timestamp` to the bucket boundary for `granularity`:
    /// verbatim for `EachBlock`, to the start of the UTC hour/day otherwise
    /// — `spec.md` §3.
    pub fn bucket_timestamp(granularity: Granularity, timestamp: u64) -> u64 {
        match granularity {
            Granularity::EachBlock => timestamp,
            Granularity::EachHour => timestamp - (timestamp % 3600),
            Granularity::EachDay => timestamp - (timestamp % 86_400),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct MarketHistoryRecord {
    pub highest_bid: Price,
    pub lowest_ask: Price,
    pub opening_price: Price,
    pub closing_price: Price,
    pub volume_shares: Shares,
}

impl MarketHistoryRecord {
    pub fn new(
        highest_bid: Price,
        lowest_ask: Price,
        opening_price: Price,
        closing_price: Price,
        volume_shares: Shares,
    ) -> Self {
        MarketHistoryRecord {
            highest_bid,
            lowest_ask,
            opening_price,
            closing_price,
            volume_shares,
        }
    }

    /// Merges a new block's roll-up into an existing hour/day bucket per
    /// `spec.md` §4.5: volume adds, `closing_price` is overwritten, and the
    /// extrema widen only when the new record's value strictly improves
    /// them (never narrows). Mirrors `update_market_history`'s
    /// `old_record.highest_bid = std::max(...)` / `std::min(...)` pair,
    /// guarded by the same "did either extremum actually move" check.
    pub fn merge_into(&mut self, new_record: &MarketHistoryRecord) {
        self.volume_shares += new_record.volume_shares;
        self.closing_price = new_record.closing_price;
        if new_record.highest_bid > self.highest_bid || new_record.lowest_ask < self.lowest_ask {
            self.highest_bid = self.highest_bid.max(new_record.highest_bid);
            self.lowest_ask = self.lowest_ask.min(new_record.lowest_ask);
        }
    }
}
