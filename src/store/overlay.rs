//! The pending-state overlay: a copy-on-write layer over committed chain
//! state that absorbs every mutation the matching engine makes, to be
//! atomically merged or discarded — `spec.md` §3 "Ownership", §4.6.
//!
//! Grounded on `original_source`'s `pending_chain_state`, which the teacher
//! has no direct analogue for (Solana account writes are already
//! transactional at the runtime level); the shape here follows `spec.md`
//! §9's "Design notes" description directly: an owning value built by
//! shallow-copying the parent handle, with explicit `apply_changes`.

use std::collections::{BTreeMap, HashMap};

use crate::quantities::AssetId;
use crate::state::{
    Address, AssetRecord, BalanceRecord, MarketHistoryKey, MarketHistoryRecord, MarketIndexKey,
    MarketStatus, OrderState,
};
use crate::store::ChainStateStore;

/// Exclusively owned by the `MatchingEngine` for the duration of one
/// `execute` call. Reads fall through to `parent` when the overlay hasn't
/// cached an override; writes land only in the overlay's local maps until
/// `apply_changes` merges them.
pub struct PendingOverlay<'a> {
    parent: &'a mut dyn ChainStateStore,
    now: u64,

    asset_overrides: HashMap<AssetId, AssetRecord>,
    balance_overrides: HashMap<Address, BalanceRecord>,
    status_overrides: HashMap<(AssetId, AssetId), MarketStatus>,
    history_overrides: HashMap<MarketHistoryKey, MarketHistoryRecord>,
    bid_overrides: HashMap<MarketIndexKey, Option<OrderState>>,
    ask_overrides: HashMap<MarketIndexKey, Option<OrderState>>,
}

impl<'a> PendingOverlay<'a> {
    /// `now` is the block timestamp the engine was invoked with, not a
    /// wall-clock read — determinism (`spec.md` §8) requires every balance
    /// stamped during this execution to carry the same value regardless of
    /// when the node actually runs it.
    pub fn new(parent: &'a mut dyn ChainStateStore, now: u64) -> Self {
        PendingOverlay {
            parent,
            now,
            asset_overrides: HashMap::new(),
            balance_overrides: HashMap::new(),
            status_overrides: HashMap::new(),
            history_overrides: HashMap::new(),
            bid_overrides: HashMap::new(),
            ask_overrides: HashMap::new(),
        }
    }

    /// Merges every override into the parent store. Consumes `self` so an
    /// overlay can only ever be committed once; on the failure path
    /// (`spec.md` §4.6) the engine simply drops the overlay instead,
    /// leaving the parent untouched.
    pub fn apply_changes(self) {
        let PendingOverlay {
            parent,
            asset_overrides,
            balance_overrides,
            status_overrides,
            history_overrides,
            bid_overrides,
            ask_overrides,
            ..
        } = self;

        for (_, record) in asset_overrides {
            parent.store_asset_record(record);
        }
        for (_, record) in balance_overrides {
            parent.store_balance_record(record);
        }
        for (_, status) in status_overrides {
            parent.store_market_status(status);
        }
        for (key, record) in history_overrides {
            parent.store_history_record(key, record);
        }
        for (key, state) in bid_overrides {
            match state {
                Some(state) => parent.store_bid_order(key, state),
                None => parent.delete_bid_order(key),
            }
        }
        for (key, state) in ask_overrides {
            match state {
                Some(state) => parent.store_ask_order(key, state),
                None => parent.delete_ask_order(key),
            }
        }
    }

    fn merged_market_view(
        parent_orders: Vec<(MarketIndexKey, OrderState)>,
        overrides: &HashMap<MarketIndexKey, Option<OrderState>>,
        quote_id: AssetId,
        base_id: AssetId,
    ) -> Vec<(MarketIndexKey, OrderState)> {
        let mut merged: BTreeMap<MarketIndexKey, OrderState> = parent_orders.into_iter().collect();
        for (key, state) in overrides {
            if key.price.market() != (quote_id, base_id) {
                continue;
            }
            match state {
                Some(state) => {
                    merged.insert(*key, *state);
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        merged.into_iter().collect()
    }
}

impl<'a> ChainStateStore for PendingOverlay<'a> {
    fn get_asset_record(&self, id: AssetId) -> Option<AssetRecord> {
        self.asset_overrides
            .get(&id)
            .cloned()
            .or_else(|| self.parent.get_asset_record(id))
    }

    fn store_asset_record(&mut self, record: AssetRecord) {
        self.asset_overrides.insert(record.asset_id, record);
    }

    fn get_balance_record(&self, address: Address) -> Option<BalanceRecord> {
        self.balance_overrides
            .get(&address)
            .cloned()
            .or_else(|| self.parent.get_balance_record(address))
    }

    fn store_balance_record(&mut self, record: BalanceRecord) {
        let address = BalanceRecord::address_of(record.owner, record.asset_id);
        self.balance_overrides.insert(address, record);
    }

    fn get_market_status(&self, quote_id: AssetId, base_id: AssetId) -> Option<MarketStatus> {
        self.status_overrides
            .get(&(quote_id, base_id))
            .cloned()
            .or_else(|| self.parent.get_market_status(quote_id, base_id))
    }

    fn store_market_status(&mut self, status: MarketStatus) {
        self.status_overrides
            .insert((status.quote_id, status.base_id), status);
    }

    fn get_history_record(&self, key: &MarketHistoryKey) -> Option<MarketHistoryRecord> {
        self.history_overrides
            .get(key)
            .cloned()
            .or_else(|| self.parent.get_history_record(key))
    }

    fn store_history_record(&mut self, key: MarketHistoryKey, record: MarketHistoryRecord) {
        self.history_overrides.insert(key, record);
    }

    fn bids_in_market(&self, quote_id: AssetId, base_id: AssetId) -> Vec<(MarketIndexKey, OrderState)> {
        Self::merged_market_view(
            self.parent.bids_in_market(quote_id, base_id),
            &self.bid_overrides,
            quote_id,
            base_id,
        )
    }

    fn asks_in_market(&self, quote_id: AssetId, base_id: AssetId) -> Vec<(MarketIndexKey, OrderState)> {
        Self::merged_market_view(
            self.parent.asks_in_market(quote_id, base_id),
            &self.ask_overrides,
            quote_id,
            base_id,
        )
    }

    fn get_bid_order(&self, key: &MarketIndexKey) -> Option<OrderState> {
        match self.bid_overrides.get(key) {
            Some(state) => *state,
            None => self.parent.get_bid_order(key),
        }
    }

    fn store_bid_order(&mut self, key: MarketIndexKey, state: OrderState) {
        self.bid_overrides.insert(key, Some(state));
    }

    fn delete_bid_order(&mut self, key: MarketIndexKey) {
        self.bid_overrides.insert(key, None);
    }

    fn get_ask_order(&self, key: &MarketIndexKey) -> Option<OrderState> {
        match self.ask_overrides.get(key) {
            Some(state) => *state,
            None => self.parent.get_ask_order(key),
        }
    }

    fn store_ask_order(&mut self, key: MarketIndexKey, state: OrderState) {
        self.ask_overrides.insert(key, Some(state));
    }

    fn delete_ask_order(&mut self, key: MarketIndexKey) {
        self.ask_overrides.insert(key, None);
    }

    fn now(&self) -> u64 {
        self.now
    }
}
