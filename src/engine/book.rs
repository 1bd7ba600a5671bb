//! Order-book traversal — `spec.md` §4.3. The underlying store already
//! returns a market's orders as a materialized, key-sorted `Vec` (see
//! `ChainStateStore::bids_in_market`/`asks_in_market`); `BookCursor` walks
//! that `Vec` in the direction the spec requires (descending price for
//! bids, ascending for asks) and always re-reads the *live* order state
//! from the store before deciding whether to advance, since settlement may
//! have mutated or deleted the order since it was materialized.
//!
//! This realizes `spec.md` §9's permitted substitution: "implementations
//! with symmetric bidirectional cursors ... can replace the
//! lower_bound-then-decrement dance with a direct reverse iterator."

use crate::state::{MarketIndexKey, OrderState};
use crate::store::ChainStateStore;

pub struct BookCursor {
    keys: Vec<MarketIndexKey>,
    idx: usize,
}

impl BookCursor {
    /// Highest-bid-first: reverses the store's ascending `bids_in_market`.
    pub fn for_bids(store: &dyn ChainStateStore, quote_id: crate::quantities::AssetId, base_id: crate::quantities::AssetId) -> Self {
        let mut keys: Vec<MarketIndexKey> = store
            .bids_in_market(quote_id, base_id)
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        keys.reverse();
        BookCursor { keys, idx: 0 }
    }

    /// Lowest-ask-first: the store already returns ascending order.
    pub fn for_asks(store: &dyn ChainStateStore, quote_id: crate::quantities::AssetId, base_id: crate::quantities::AssetId) -> Self {
        let keys: Vec<MarketIndexKey> = store
            .asks_in_market(quote_id, base_id)
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        BookCursor { keys, idx: 0 }
    }

    /// Advances past dead entries (absent or zero-balance) and returns the
    /// next live `(key, state)` pair, or `None` once the cursor is
    /// exhausted — `spec.md` §4.1 step 2a/2b.
    pub fn next_live(&mut self, store: &dyn ChainStateStore, get: impl Fn(&dyn ChainStateStore, &MarketIndexKey) -> Option<OrderState>) -> Option<(MarketIndexKey, OrderState)> {
        while self.idx < self.keys.len() {
            let key = self.keys[self.idx];
            match get(store, &key) {
                Some(state) if state.balance > 0 => return Some((key, state)),
                _ => {
                    self.idx += 1;
                    continue;
                }
            }
        }
        None
    }

    /// Marks the current head consumed without fetching a new one; called
    /// once the live order at the cursor's current position has just been
    /// driven to (or already was at) zero balance by settlement.
    pub fn advance(&mut self) {
        self.idx += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantities::{AssetId, Price};
    use crate::state::Address;
    use crate::store::InMemoryStore;

    #[test]
    fn bid_cursor_is_descending_by_price() {
        let mut store = InMemoryStore::new();
        let owner = Address::zero();
        let low = Price::new(AssetId(1), AssetId(0), 1, 1);
        let high = Price::new(AssetId(1), AssetId(0), 3, 1);
        store.store_bid_order(MarketIndexKey::new(low, owner), OrderState::new(10));
        store.store_bid_order(MarketIndexKey::new(high, owner), OrderState::new(10));

        let mut cursor = BookCursor::for_bids(&store, AssetId(1), AssetId(0));
        let (key, _) = cursor
            .next_live(&store, |s, k| s.get_bid_order(k))
            .unwrap();
        assert_eq!(key.price, high);
    }

    #[test]
    fn ask_cursor_is_ascending_by_price() {
        let mut store = InMemoryStore::new();
        let owner = Address::zero();
        let low = Price::new(AssetId(1), AssetId(0), 1, 1);
        let high = Price::new(AssetId(1), AssetId(0), 3, 1);
        store.store_ask_order(MarketIndexKey::new(low, owner), OrderState::new(10));
        store.store_ask_order(MarketIndexKey::new(high, owner), OrderState::new(10));

        let mut cursor = BookCursor::for_asks(&store, AssetId(1), AssetId(0));
        let (key, _) = cursor
            .next_live(&store, |s, k| s.get_ask_order(k))
            .unwrap();
        assert_eq!(key.price, low);
    }
}
