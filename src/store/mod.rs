//! `ChainStateStore`: the trait boundary between the matching engine and
//! the surrounding chain database (`spec.md` §6). The engine only ever
//! touches chain state through this trait plus the `PendingOverlay` built
//! on top of it; neither the concrete database nor the block/consensus
//! machinery around it are this crate's concern.
//!
//! Grounded on the teacher's `Market`/`WritableMarket` trait-with-a-`&dyn`
//! idiom in `state/markets/market_traits.rs`: a plain trait object stands
//! in for "the collaborator that owns persistence", and `InMemoryStore`
//! (in `memory.rs`) plays the role `FIFOMarket` plays there — a concrete
//! implementor kept alongside the trait, usable directly in tests.

pub mod memory;
pub mod overlay;

use crate::quantities::AssetId;
use crate::state::{Address, AssetRecord, BalanceRecord, MarketHistoryKey, MarketHistoryRecord, MarketIndexKey, MarketStatus, OrderState};

pub use memory::InMemoryStore;
pub use overlay::PendingOverlay;

/// The persistence contract the matching engine requires of chain state —
/// `spec.md` §6. Every method here is a direct analogue of a
/// `pending_chain_state`/`chain_database_impl` accessor in
/// `original_source`'s `market_engine.cpp`.
pub trait ChainStateStore {
    fn get_asset_record(&self, id: AssetId) -> Option<AssetRecord>;
    fn store_asset_record(&mut self, record: AssetRecord);

    fn get_balance_record(&self, address: Address) -> Option<BalanceRecord>;
    fn store_balance_record(&mut self, record: BalanceRecord);

    fn get_market_status(&self, quote_id: AssetId, base_id: AssetId) -> Option<MarketStatus>;
    fn store_market_status(&mut self, status: MarketStatus);

    fn get_history_record(&self, key: &MarketHistoryKey) -> Option<MarketHistoryRecord>;
    fn store_history_record(&mut self, key: MarketHistoryKey, record: MarketHistoryRecord);

    /// The bid book restricted to `(quote_id, base_id)`, returned in
    /// ascending key order (ascending price, i.e. *worst* bid first). The
    /// engine reverses this to get highest-bid-first traversal — see
    /// `engine::book::BookCursor`.
    fn bids_in_market(&self, quote_id: AssetId, base_id: AssetId) -> Vec<(MarketIndexKey, OrderState)>;

    /// The ask book restricted to `(quote_id, base_id)`, ascending key
    /// order (ascending price, lowest ask first) — already the traversal
    /// order the engine wants.
    fn asks_in_market(&self, quote_id: AssetId, base_id: AssetId) -> Vec<(MarketIndexKey, OrderState)>;

    fn get_bid_order(&self, key: &MarketIndexKey) -> Option<OrderState>;
    fn store_bid_order(&mut self, key: MarketIndexKey, state: OrderState);
    fn delete_bid_order(&mut self, key: MarketIndexKey);

    fn get_ask_order(&self, key: &MarketIndexKey) -> Option<OrderState>;
    fn store_ask_order(&mut self, key: MarketIndexKey, state: OrderState);
    fn delete_ask_order(&mut self, key: MarketIndexKey);

    /// The timestamp stamped onto credited balances — `spec.md` §6's
    /// `now()`. A `PendingOverlay` overrides this with the block timestamp
    /// it was opened with, so settlement is deterministic regardless of
    /// wall-clock time; see `PendingOverlay::now`.
    fn now(&self) -> u64;
}
