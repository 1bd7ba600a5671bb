//! Settlement: crediting matched funds, issuer fees, dust sweeping —
//! `spec.md` §4.4, with the fee-routing resolution recorded in
//! `SPEC_FULL.md` §4.4 / `DESIGN.md`. Grounded directly on
//! `original_source`'s `pay_current_bid`/`pay_current_ask`.

use crate::error::{ensure, EngineError};
use crate::quantities::{AssetId, Price};
use crate::state::{AssetRecord, BalanceRecord, MarketIndexKey, MarketTransaction, OrderState};
use crate::store::ChainStateStore;

/// The bid owner receives **base** asset. Deducts `mtrx.bid_paid` (quote)
/// from the resting bid's balance, assesses `base_asset`'s issuer fee on
/// `mtrx.bid_received` (base), credits the payee, and sweeps quote dust
/// that can no longer buy a single base unit at `bid_price` into
/// `mtrx.quote_fees`.
///
/// Returns the (possibly zeroed) resulting order balance; the caller
/// persists or deletes the resting order based on it.
#[allow(clippy::too_many_arguments)]
pub fn pay_current_bid(
    store: &mut dyn ChainStateStore,
    mtrx: &mut MarketTransaction,
    bid_key: MarketIndexKey,
    mut bid_state: OrderState,
    bid_price: Price,
    base_asset: &AssetRecord,
    base_id: AssetId,
) -> Result<OrderState, EngineError> {
    bid_state.balance -= mtrx.bid_paid;
    ensure(bid_state.balance >= 0, "bid order balance went negative")?;

    ensure(
        base_asset.whitelist.accepts(mtrx.bid_owner),
        "bid owner not whitelisted to receive base asset",
    )?;

    let payout_address = BalanceRecord::address_of(mtrx.bid_owner, base_id);
    let mut payout = store
        .get_balance_record(payout_address)
        .unwrap_or_else(|| BalanceRecord::new(mtrx.bid_owner, base_id, store.now()));

    let issuer_fee = base_asset.issuer_fee(mtrx.bid_received);
    mtrx.base_fees += issuer_fee;
    mtrx.bid_received -= issuer_fee;

    payout.credit(mtrx.bid_received, store.now());
    store.store_balance_record(payout);

    sweep_bid_dust(mtrx, &mut bid_state, bid_price);

    if bid_state.balance > 0 {
        store.store_bid_order(bid_key, bid_state);
    } else {
        store.delete_bid_order(bid_key);
    }

    Ok(bid_state)
}

/// The ask owner receives **quote** asset. Symmetric to `pay_current_bid`.
#[allow(clippy::too_many_arguments)]
pub fn pay_current_ask(
    store: &mut dyn ChainStateStore,
    mtrx: &mut MarketTransaction,
    ask_key: MarketIndexKey,
    mut ask_state: OrderState,
    ask_price: Price,
    quote_asset: &AssetRecord,
    quote_id: AssetId,
) -> Result<OrderState, EngineError> {
    ask_state.balance -= mtrx.ask_paid;
    ensure(ask_state.balance >= 0, "ask order balance went negative")?;

    ensure(
        quote_asset.whitelist.accepts(mtrx.ask_owner),
        "ask owner not whitelisted to receive quote asset",
    )?;

    let payout_address = BalanceRecord::address_of(mtrx.ask_owner, quote_id);
    let mut payout = store
        .get_balance_record(payout_address)
        .unwrap_or_else(|| BalanceRecord::new(mtrx.ask_owner, quote_id, store.now()));

    let issuer_fee = quote_asset.issuer_fee(mtrx.ask_received);
    mtrx.quote_fees += issuer_fee;
    mtrx.ask_received -= issuer_fee;

    payout.credit(mtrx.ask_received, store.now());
    store.store_balance_record(payout);

    sweep_ask_dust(mtrx, &mut ask_state, ask_price);

    if ask_state.balance > 0 {
        store.store_ask_order(ask_key, ask_state);
    } else {
        store.delete_ask_order(ask_key);
    }

    Ok(ask_state)
}

/// If the bid's remaining quote balance would buy zero base units at
/// `bid_price`, it can never be traded again; sweep it to `quote_fees` and
/// zero the order — `spec.md` §4.4 step 6.
fn sweep_bid_dust(mtrx: &mut MarketTransaction, bid_state: &mut OrderState, bid_price: Price) {
    if bid_price.quote_to_base(bid_state.balance) == 0 {
        mtrx.quote_fees += bid_state.balance;
        bid_state.balance = 0;
    }
}

/// Symmetric dust sweep for the ask side, into `base_fees`.
fn sweep_ask_dust(mtrx: &mut MarketTransaction, ask_state: &mut OrderState, ask_price: Price) {
    if ask_price.base_to_quote(ask_state.balance) == 0 {
        mtrx.base_fees += ask_state.balance;
        ask_state.balance = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Address, Whitelist};
    use crate::store::{ChainStateStore, InMemoryStore};

    fn price(n: u64, d: u64) -> Price {
        Price::new(AssetId(1), AssetId(0), n, d)
    }

    #[test]
    fn issuer_fee_reduces_credited_amount() {
        // scenario 5: base_asset fee rate 1%, bid_received 100 -> credited 99, base_fees 1
        let mut store = InMemoryStore::new();
        let base_asset = AssetRecord::new(AssetId(0), 100, Whitelist::Unrestricted);
        let owner = Address([1u8; 32]);
        let key = MarketIndexKey::new(price(2, 1), owner);
        let mut mtrx = MarketTransaction::new(owner, Address([2u8; 32]), price(2, 1), price(2, 1));
        mtrx.bid_paid = 200;
        mtrx.bid_received = 100;

        pay_current_bid(&mut store, &mut mtrx, key, OrderState::new(200), price(2, 1), &base_asset, AssetId(0)).unwrap();

        assert_eq!(mtrx.bid_received, 99);
        assert_eq!(mtrx.base_fees, 1);
        let payout = store
            .get_balance_record(BalanceRecord::address_of(owner, AssetId(0)))
            .unwrap();
        assert_eq!(payout.shares, 99);
    }

    #[test]
    fn whitelist_rejection_is_fatal() {
        let mut store = InMemoryStore::new();
        let owner = Address([1u8; 32]);
        let base_asset = AssetRecord::new(AssetId(0), 0, Whitelist::Denylist([owner].into_iter().collect()));
        let key = MarketIndexKey::new(price(2, 1), owner);
        let mut mtrx = MarketTransaction::new(owner, Address([2u8; 32]), price(2, 1), price(2, 1));
        mtrx.bid_paid = 200;
        mtrx.bid_received = 100;

        let result = pay_current_bid(&mut store, &mut mtrx, key, OrderState::new(200), price(2, 1), &base_asset, AssetId(0));
        assert!(result.is_err());
    }
}
