use borsh::{BorshDeserialize, BorshSerialize};

use crate::quantities::{Price, Shares};
use crate::state::Address;

/// Which book a resting order lives in. Grounded on the teacher's
/// `state/enums.rs::Side`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

/// `(price, owner)`, the storage key for a resting order. `Ord` is derived
/// in field order, so ordering by `price` first (which embeds `(quote_id,
/// base_id)`) keeps every market's orders totally separable within a single
/// ordered map — `spec.md` §3.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, BorshSerialize, BorshDeserialize)]
pub struct MarketIndexKey {
    pub price: Price,
    pub owner: Address,
}

impl MarketIndexKey {
    pub fn new(price: Price, owner: Address) -> Self {
        MarketIndexKey { price, owner }
    }
}

/// A resting order's mutable state. Side and owner live in the map it
/// occupies and the key it's stored under, respectively; per `spec.md` §3
/// only `balance` is carried here.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, BorshSerialize, BorshDeserialize)]
pub struct OrderState {
    pub balance: Shares,
}

impl OrderState {
    pub fn new(balance: Shares) -> Self {
        OrderState { balance }
    }

    pub fn is_exhausted(&self) -> bool {
        self.balance <= 0
    }
}
