//! A reference `ChainStateStore` backed by `BTreeMap`s, usable directly in
//! tests and as a runnable example of the trait contract — `spec.md` §6,
//! §9's permitted substitution of the lower_bound/decrement dance with
//! native double-ended range queries.
//!
//! Grounded on the teacher's pairing of a trait (`Market`) with a concrete
//! implementor (`FIFOMarket` in `state/markets/fifo.rs`) kept in the same
//! module family.

use std::collections::BTreeMap;

use crate::quantities::AssetId;
use crate::state::{
    Address, AssetRecord, BalanceRecord, MarketHistoryKey, MarketHistoryRecord, MarketIndexKey,
    MarketStatus, OrderState,
};
use crate::store::ChainStateStore;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    assets: BTreeMap<AssetId, AssetRecord>,
    balances: BTreeMap<Address, BalanceRecord>,
    statuses: BTreeMap<(AssetId, AssetId), MarketStatus>,
    history: BTreeMap<MarketHistoryKey, MarketHistoryRecord>,
    bids: BTreeMap<MarketIndexKey, OrderState>,
    asks: BTreeMap<MarketIndexKey, OrderState>,
    clock: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value `now()` returns. Only meaningful when this store is
    /// used directly (outside a `PendingOverlay`, which always supplies
    /// its own block timestamp instead) — e.g. in tests that exercise
    /// `get_balance_record`/credit without going through `execute`.
    pub fn set_now(&mut self, now: u64) {
        self.clock = now;
    }

    fn orders_in_market(
        book: &BTreeMap<MarketIndexKey, OrderState>,
        quote_id: AssetId,
        base_id: AssetId,
    ) -> Vec<(MarketIndexKey, OrderState)> {
        book.iter()
            .filter(|(key, _)| key.price.market() == (quote_id, base_id))
            .map(|(key, state)| (*key, *state))
            .collect()
    }
}

impl ChainStateStore for InMemoryStore {
    fn get_asset_record(&self, id: AssetId) -> Option<AssetRecord> {
        self.assets.get(&id).cloned()
    }

    fn store_asset_record(&mut self, record: AssetRecord) {
        self.assets.insert(record.asset_id, record);
    }

    fn get_balance_record(&self, address: Address) -> Option<BalanceRecord> {
        self.balances.get(&address).cloned()
    }

    fn store_balance_record(&mut self, record: BalanceRecord) {
        let address = BalanceRecord::address_of(record.owner, record.asset_id);
        self.balances.insert(address, record);
    }

    fn get_market_status(&self, quote_id: AssetId, base_id: AssetId) -> Option<MarketStatus> {
        self.statuses.get(&(quote_id, base_id)).cloned()
    }

    fn store_market_status(&mut self, status: MarketStatus) {
        self.statuses.insert((status.quote_id, status.base_id), status);
    }

    fn get_history_record(&self, key: &MarketHistoryKey) -> Option<MarketHistoryRecord> {
        self.history.get(key).cloned()
    }

    fn store_history_record(&mut self, key: MarketHistoryKey, record: MarketHistoryRecord) {
        self.history.insert(key, record);
    }

    fn bids_in_market(&self, quote_id: AssetId, base_id: AssetId) -> Vec<(MarketIndexKey, OrderState)> {
        Self::orders_in_market(&self.bids, quote_id, base_id)
    }

    fn asks_in_market(&self, quote_id: AssetId, base_id: AssetId) -> Vec<(MarketIndexKey, OrderState)> {
        Self::orders_in_market(&self.asks, quote_id, base_id)
    }

    fn get_bid_order(&self, key: &MarketIndexKey) -> Option<OrderState> {
        self.bids.get(key).copied()
    }

    fn store_bid_order(&mut self, key: MarketIndexKey, state: OrderState) {
        self.bids.insert(key, state);
    }

    fn delete_bid_order(&mut self, key: MarketIndexKey) {
        self.bids.remove(&key);
    }

    fn get_ask_order(&self, key: &MarketIndexKey) -> Option<OrderState> {
        self.asks.get(key).copied()
    }

    fn store_ask_order(&mut self, key: MarketIndexKey, state: OrderState) {
        self.asks.insert(key, state);
    }

    fn delete_ask_order(&mut self, key: MarketIndexKey) {
        self.asks.remove(&key);
    }

    fn now(&self) -> u64 {
        self.clock
    }
}
