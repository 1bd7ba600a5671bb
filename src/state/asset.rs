use std::collections::BTreeSet;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::quantities::{AssetId, Shares, MAX_MARKET_FEE_RATE};
use crate::state::Address;

/// Owner-address predicate gating who may receive a given asset. Stands in
/// for `asset_record::address_is_whitelisted` in `original_source`; most
/// assets are unrestricted, matching the common case in the original where
/// only regulated/whitelisted asset types carry a non-trivial predicate.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum Whitelist {
    Unrestricted,
    Denylist(BTreeSet<Address>),
    Allowlist(BTreeSet<Address>),
}

impl Whitelist {
    pub fn accepts(&self, owner: Address) -> bool {
        match self {
            Whitelist::Unrestricted => true,
            Whitelist::Denylist(set) => !set.contains(&owner),
            Whitelist::Allowlist(set) => set.contains(&owner),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct AssetRecord {
    pub asset_id: AssetId,
    pub halted_markets: bool,
    /// Parts-per-`MAX_MARKET_FEE_RATE`. Invariant: `0 <= market_fee_rate <=
    /// MAX_MARKET_FEE_RATE`, checked in `AssetRecord::new`.
    pub market_fee_rate: u64,
    pub collected_fees: Shares,
    pub whitelist: Whitelist,
}

impl AssetRecord {
    pub fn new(asset_id: AssetId, market_fee_rate: u64, whitelist: Whitelist) -> Self {
        assert!(
            market_fee_rate <= MAX_MARKET_FEE_RATE,
            "market_fee_rate out of bounds"
        );
        AssetRecord {
            asset_id,
            halted_markets: false,
            market_fee_rate,
            collected_fees: 0,
            whitelist,
        }
    }

    /// `floor(received_amount * market_fee_rate / MAX_MARKET_FEE_RATE)`,
    /// per `spec.md` §4.4 step 4.
    pub fn issuer_fee(&self, received_amount: Shares) -> Shares {
        debug_assert!(received_amount >= 0);
        ((received_amount as u128) * (self.market_fee_rate as u128) / (MAX_MARKET_FEE_RATE as u128))
            as Shares
    }
}
