use borsh::{BorshDeserialize, BorshSerialize};

use crate::quantities::{AssetId, Shares};
use crate::state::Address;

/// A single owner's holding of a single asset, keyed by a derived address
/// from `(owner, asset_id)` per `spec.md` §3. Grounded on the teacher's
/// `TraderState` (per-market locked/free lot fields), flattened here to the
/// single-asset-per-record shape `spec.md` actually calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct BalanceRecord {
    pub owner: Address,
    pub asset_id: AssetId,
    pub shares: Shares,
    pub last_update: u64,
    pub deposit_date: u64,
}

impl BalanceRecord {
    pub fn new(owner: Address, asset_id: AssetId, now: u64) -> Self {
        BalanceRecord {
            owner,
            asset_id,
            shares: 0,
            last_update: now,
            deposit_date: now,
        }
    }

    /// Derived address a `ChainStateStore` keys this record by: the owner's
    /// signature-withdraw address narrowed to a single asset, matching
    /// `withdraw_condition(withdraw_with_signature(owner), asset_id).get_address()`
    /// in `original_source`.
    pub fn address_of(owner: Address, asset_id: AssetId) -> Address {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&owner.0[..16]);
        bytes[16..24].copy_from_slice(&asset_id.0.to_le_bytes());
        bytes[24..].copy_from_slice(&owner.0[16..24]);
        Address(bytes)
    }

    pub fn credit(&mut self, amount: Shares, now: u64) {
        self.shares += amount;
        self.last_update = now;
        self.deposit_date = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_derivation_is_stable_per_owner_and_asset() {
        let owner = Address([7u8; 32]);
        let a = BalanceRecord::address_of(owner, AssetId(1));
        let b = BalanceRecord::address_of(owner, AssetId(1));
        let c = BalanceRecord::address_of(owner, AssetId(2));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
