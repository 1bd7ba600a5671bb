//! End-to-end scenarios against `MatchingEngine::execute`, one per concrete
//! example in `spec.md` §8.

use market_engine_core::quantities::{AssetId, Price};
use market_engine_core::state::{Address, AssetRecord, MarketIndexKey, OrderState, Side, Whitelist};
use market_engine_core::store::{ChainStateStore, InMemoryStore};
use market_engine_core::MatchingEngine;

const QUOTE: AssetId = AssetId(1);
const BASE: AssetId = AssetId(0);

fn price(n: u64, d: u64) -> Price {
    Price::new(QUOTE, BASE, n, d)
}

fn owner(tag: u8) -> Address {
    Address([tag; 32])
}

fn seed_market(store: &mut InMemoryStore, quote_fee: u64, base_fee: u64) {
    store.store_asset_record(AssetRecord::new(QUOTE, quote_fee, Whitelist::Unrestricted));
    store.store_asset_record(AssetRecord::new(BASE, base_fee, Whitelist::Unrestricted));
}

fn place_bid(store: &mut InMemoryStore, owner: Address, price: Price, quote_balance: i64) {
    store.store_bid_order(MarketIndexKey::new(price, owner), OrderState::new(quote_balance));
}

fn place_ask(store: &mut InMemoryStore, owner: Address, price: Price, base_balance: i64) {
    store.store_ask_order(MarketIndexKey::new(price, owner), OrderState::new(base_balance));
}

#[test]
fn scenario_1_empty_book() {
    let mut store = InMemoryStore::new();
    seed_market(&mut store, 0, 0);

    let mut engine = MatchingEngine::new();
    let ok = engine.execute(&mut store, QUOTE, BASE, 1000);

    assert!(ok);
    assert!(engine.transactions().is_empty());
    let status = store.get_market_status(QUOTE, BASE).unwrap();
    assert!(status.last_error.is_none());
}

#[test]
fn scenario_2_exact_match_no_fees() {
    let mut store = InMemoryStore::new();
    seed_market(&mut store, 0, 0);
    let a = owner(1);
    let b = owner(2);
    place_bid(&mut store, a, price(2, 1), 200);
    place_ask(&mut store, b, price(2, 1), 100);

    let mut engine = MatchingEngine::new();
    assert!(engine.execute(&mut store, QUOTE, BASE, 1000));

    let txs = engine.transactions();
    assert_eq!(txs.len(), 1);
    let tx = &txs[0];
    assert_eq!(tx.bid_paid, 200);
    assert_eq!(tx.bid_received, 100);
    assert_eq!(tx.ask_paid, 100);
    assert_eq!(tx.ask_received, 200);
    assert_eq!(tx.quote_fees, 0);
    assert_eq!(tx.base_fees, 0);

    assert!(store.get_bid_order(&MarketIndexKey::new(price(2, 1), a)).is_none());
    assert!(store.get_ask_order(&MarketIndexKey::new(price(2, 1), b)).is_none());
}

#[test]
fn scenario_3_price_overlap_wedge() {
    let mut store = InMemoryStore::new();
    seed_market(&mut store, 0, 0);
    let a = owner(1);
    let b = owner(2);
    place_bid(&mut store, a, price(3, 1), 300);
    place_ask(&mut store, b, price(2, 1), 100);

    let mut engine = MatchingEngine::new();
    assert!(engine.execute(&mut store, QUOTE, BASE, 1000));

    let tx = &engine.transactions()[0];
    assert_eq!(tx.bid_paid, 300);
    assert_eq!(tx.ask_received, 200);
    assert_eq!(tx.quote_fees, 100);
    assert_eq!(tx.ask_paid, 100);
    assert_eq!(tx.bid_received, 100);

    let quote_asset = store.get_asset_record(QUOTE).unwrap();
    assert_eq!(quote_asset.collected_fees, 100);
}

#[test]
fn scenario_4_partial_fill_with_dust_sweep() {
    let mut store = InMemoryStore::new();
    seed_market(&mut store, 0, 0);
    let a = owner(1);
    let b = owner(2);
    place_bid(&mut store, a, price(3, 2), 10);
    place_ask(&mut store, b, price(3, 2), 100);

    let mut engine = MatchingEngine::new();
    assert!(engine.execute(&mut store, QUOTE, BASE, 1000));

    let tx = &engine.transactions()[0];
    assert_eq!(tx.bid_paid, 10);
    assert_eq!(tx.ask_received, 9);
    assert_eq!(tx.quote_fees, 1);

    assert!(store.get_bid_order(&MarketIndexKey::new(price(3, 2), a)).is_none());
    let ask = store.get_ask_order(&MarketIndexKey::new(price(3, 2), b)).unwrap();
    assert_eq!(ask.balance, 94);
}

#[test]
fn scenario_5_issuer_fee() {
    let mut store = InMemoryStore::new();
    // base_asset.market_fee_rate = MAX/100 (1%)
    seed_market(&mut store, 0, 100);
    let a = owner(1);
    let b = owner(2);
    place_bid(&mut store, a, price(2, 1), 200);
    place_ask(&mut store, b, price(2, 1), 100);

    let mut engine = MatchingEngine::new();
    assert!(engine.execute(&mut store, QUOTE, BASE, 1000));

    let tx = &engine.transactions()[0];
    assert_eq!(tx.base_fees, 1);
    assert_eq!(tx.quote_fees, 0);

    use market_engine_core::state::BalanceRecord;
    let bid_payout = store
        .get_balance_record(BalanceRecord::address_of(a, BASE))
        .unwrap();
    assert_eq!(bid_payout.shares, 99);
    let ask_payout = store
        .get_balance_record(BalanceRecord::address_of(b, QUOTE))
        .unwrap();
    assert_eq!(ask_payout.shares, 200);
}

#[test]
fn scenario_6_no_overlap_terminates_immediately() {
    let mut store = InMemoryStore::new();
    seed_market(&mut store, 0, 0);
    let a = owner(1);
    let b = owner(2);
    place_bid(&mut store, a, price(1, 1), 100);
    place_ask(&mut store, b, price(2, 1), 100);

    let mut engine = MatchingEngine::new();
    assert!(engine.execute(&mut store, QUOTE, BASE, 1000));
    assert!(engine.transactions().is_empty());

    let status = store.get_market_status(QUOTE, BASE).unwrap();
    assert!(status.last_error.is_none());
    // both orders remain resting
    assert_eq!(
        store.get_bid_order(&MarketIndexKey::new(price(1, 1), a)).unwrap().balance,
        100
    );
    assert_eq!(
        store.get_ask_order(&MarketIndexKey::new(price(2, 1), b)).unwrap().balance,
        100
    );
}

#[test]
fn invalid_market_is_fatal_and_preserves_parent_state() {
    let mut store = InMemoryStore::new();
    // BASE asset never registered -> invalid_market.
    store.store_asset_record(AssetRecord::new(QUOTE, 0, Whitelist::Unrestricted));
    let a = owner(1);
    place_bid(&mut store, a, price(2, 1), 200);

    let mut engine = MatchingEngine::new();
    let ok = engine.execute(&mut store, QUOTE, BASE, 1000);

    assert!(!ok);
    assert!(engine.transactions().is_empty());
    let status = store.get_market_status(QUOTE, BASE).unwrap();
    assert!(status.last_error.is_some());
    // the resting bid was never touched
    assert_eq!(
        store.get_bid_order(&MarketIndexKey::new(price(2, 1), a)).unwrap().balance,
        200
    );
}

#[test]
fn halted_market_is_fatal() {
    let mut store = InMemoryStore::new();
    let mut quote_asset = AssetRecord::new(QUOTE, 0, Whitelist::Unrestricted);
    quote_asset.halted_markets = true;
    store.store_asset_record(quote_asset);
    store.store_asset_record(AssetRecord::new(BASE, 0, Whitelist::Unrestricted));

    let mut engine = MatchingEngine::new();
    assert!(!engine.execute(&mut store, QUOTE, BASE, 1000));
}

#[test]
fn whitelist_rejection_discards_the_whole_overlay() {
    let mut store = InMemoryStore::new();
    let a = owner(1);
    let b = owner(2);
    store.store_asset_record(AssetRecord::new(QUOTE, 0, Whitelist::Unrestricted));
    // bid owner a is denylisted from receiving the base asset it would be paid.
    store.store_asset_record(AssetRecord::new(
        BASE,
        0,
        Whitelist::Denylist([a].into_iter().collect()),
    ));
    place_bid(&mut store, a, price(2, 1), 200);
    place_ask(&mut store, b, price(2, 1), 100);

    let mut engine = MatchingEngine::new();
    let ok = engine.execute(&mut store, QUOTE, BASE, 1000);

    assert!(!ok);
    // neither order was mutated -- the overlay that staged the partial
    // settlement was discarded whole.
    assert_eq!(
        store.get_bid_order(&MarketIndexKey::new(price(2, 1), a)).unwrap().balance,
        200
    );
    assert_eq!(
        store.get_ask_order(&MarketIndexKey::new(price(2, 1), b)).unwrap().balance,
        100
    );
}

#[test]
fn reexecuting_an_empty_book_is_idempotent() {
    let mut store = InMemoryStore::new();
    seed_market(&mut store, 0, 0);

    let mut engine = MatchingEngine::new();
    assert!(engine.execute(&mut store, QUOTE, BASE, 1000));
    assert!(engine.execute(&mut store, QUOTE, BASE, 2000));
    assert!(engine.transactions().is_empty());
}

#[test]
fn multiple_bids_walk_down_the_book_highest_price_first() {
    let mut store = InMemoryStore::new();
    seed_market(&mut store, 0, 0);
    let low_bidder = owner(1);
    let high_bidder = owner(2);
    let asker = owner(3);

    place_bid(&mut store, low_bidder, price(2, 1), 200);
    place_bid(&mut store, high_bidder, price(3, 1), 300);
    place_ask(&mut store, asker, price(1, 1), 200);

    let mut engine = MatchingEngine::new();
    assert!(engine.execute(&mut store, QUOTE, BASE, 1000));

    let txs = engine.transactions();
    assert_eq!(txs.len(), 2);
    // highest bid (owner 2, price 3/1) trades first.
    assert_eq!(txs[0].bid_owner, high_bidder);
    assert_eq!(txs[1].bid_owner, low_bidder);
}

#[test]
fn history_is_recorded_per_block_hour_and_day() {
    use market_engine_core::state::{Granularity, MarketHistoryKey};

    let mut store = InMemoryStore::new();
    seed_market(&mut store, 0, 0);
    place_bid(&mut store, owner(1), price(2, 1), 200);
    place_ask(&mut store, owner(2), price(2, 1), 100);

    let mut engine = MatchingEngine::new();
    assert!(engine.execute(&mut store, QUOTE, BASE, 3_661));

    let block_key = MarketHistoryKey::new(QUOTE, BASE, Granularity::EachBlock, 3_661);
    assert!(store.get_history_record(&block_key).is_some());
    let hour_key = MarketHistoryKey::new(QUOTE, BASE, Granularity::EachHour, 3_600);
    assert!(store.get_history_record(&hour_key).is_some());
    let day_key = MarketHistoryKey::new(QUOTE, BASE, Granularity::EachDay, 0);
    assert!(store.get_history_record(&day_key).is_some());
}

#[test]
fn determinism_same_inputs_produce_identical_transactions() {
    let build_store = || {
        let mut store = InMemoryStore::new();
        seed_market(&mut store, 50, 25);
        place_bid(&mut store, owner(1), price(3, 1), 300);
        place_bid(&mut store, owner(2), price(2, 1), 200);
        place_ask(&mut store, owner(3), price(1, 1), 100);
        place_ask(&mut store, owner(4), price(2, 1), 150);
        store
    };

    let mut store_a = build_store();
    let mut store_b = build_store();
    let mut engine_a = MatchingEngine::new();
    let mut engine_b = MatchingEngine::new();

    assert!(engine_a.execute(&mut store_a, QUOTE, BASE, 5_000));
    assert!(engine_b.execute(&mut store_b, QUOTE, BASE, 5_000));

    assert_eq!(engine_a.transactions(), engine_b.transactions());
}

#[test]
fn side_enum_is_opposable() {
    assert_eq!(Side::Bid.opposite(), Side::Ask);
    assert_eq!(Side::Ask.opposite(), Side::Bid);
}
