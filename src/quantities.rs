//! Fixed-point building blocks: asset identifiers, signed share amounts and
//! exact rational prices. No floating point appears anywhere in this module,
//! or anywhere downstream that touches consensus state — see `spec.md` §9.
//!
//! The newtype-over-a-primitive idiom here (`#[repr(C)]`, `Pod`/`Zeroable`,
//! `Copy`/`Clone`) follows the teacher's `quantities.rs` (`BaseLots`,
//! `QuoteLots`, `Ticks`), adapted from `u64` lot counts to the signed share
//! counts and rational prices this spec calls for.

use borsh::{BorshDeserialize, BorshSerialize};
use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;
use std::cmp::Ordering;

/// Parts-per this constant is the fee-rate denominator, matching
/// `market_fee_rate in parts-per-MAX` in `spec.md` §3.
pub const MAX_MARKET_FEE_RATE: u64 = 10_000;

// Pinned for wire compatibility (`spec.md` §6): `AssetId` is a bare `u64` on
// the wire, same discipline as the teacher's `MarketHeader` size pin in
// `validation/loaders.rs`.
const_assert_eq!(std::mem::size_of::<AssetId>(), 8);

#[repr(C)]
#[derive(
    Eq, PartialEq, Ord, PartialOrd, Debug, Default, Copy, Clone, Hash, Zeroable, Pod,
    BorshSerialize, BorshDeserialize,
)]
pub struct AssetId(pub u64);

impl AssetId {
    /// Asset 0 is the native/core asset used for trading-volume denomination.
    pub const NATIVE: AssetId = AssetId(0);

    pub fn is_native(self) -> bool {
        self == Self::NATIVE
    }
}

impl From<u64> for AssetId {
    fn from(v: u64) -> Self {
        AssetId(v)
    }
}

/// A signed share count. Non-negative in every user-visible context, but
/// kept signed (matching `spec.md` §3's "signed 64-bit integer") so
/// intermediate bookkeeping can detect an accidental negative without
/// wrapping.
pub type Shares = i64;

#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub struct AssetAmount {
    pub asset_id: AssetId,
    pub shares: Shares,
}

impl AssetAmount {
    pub fn new(asset_id: AssetId, shares: Shares) -> Self {
        Self { asset_id, shares }
    }

    pub const fn zero(asset_id: AssetId) -> Self {
        Self {
            asset_id,
            shares: 0,
        }
    }
}

/// An exact rational price, `quote_per_base`, annotated with the market it
/// belongs to. Ordering is lexicographic on `(quote_asset_id, base_asset_id,
/// ratio)`, so a single ordered map keyed on `Price` keeps every market's
/// orders totally separable — see `spec.md` §3.
///
/// The ratio is kept in lowest terms so two `Price` values for the same
/// market compare equal iff they represent the same rational number,
/// independent of how they were constructed.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, BorshSerialize, BorshDeserialize)]
pub struct Price {
    pub quote_asset_id: AssetId,
    pub base_asset_id: AssetId,
    numerator: u64,
    denominator: u64,
}

impl Price {
    /// The sentinel "unset" price used by the history accumulator: both
    /// asset ids zero, ratio 0/1.
    pub const UNSET: Price = Price {
        quote_asset_id: AssetId(0),
        base_asset_id: AssetId(0),
        numerator: 0,
        denominator: 1,
    };

    pub fn new(quote_asset_id: AssetId, base_asset_id: AssetId, numerator: u64, denominator: u64) -> Self {
        assert!(denominator != 0, "Price denominator must be non-zero");
        let g = gcd(numerator, denominator).max(1);
        Price {
            quote_asset_id,
            base_asset_id,
            numerator: numerator / g,
            denominator: denominator / g,
        }
    }

    pub fn is_unset(self) -> bool {
        self.quote_asset_id.is_native() && self.base_asset_id.is_native()
    }

    pub fn market(self) -> (AssetId, AssetId) {
        (self.quote_asset_id, self.base_asset_id)
    }

    /// `floor(base_shares * numerator / denominator)`: quote shares owed for
    /// `base_shares` base shares at this price. Truncates toward zero per
    /// `spec.md` §4.2.
    pub fn base_to_quote(self, base_shares: Shares) -> Shares {
        widened_mul_div(base_shares, self.numerator, self.denominator)
    }

    /// `floor(quote_shares * denominator / numerator)`: base shares obtainable
    /// for `quote_shares` quote shares at this price.
    pub fn quote_to_base(self, quote_shares: Shares) -> Shares {
        widened_mul_div(quote_shares, self.denominator, self.numerator)
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.quote_asset_id, self.base_asset_id)
            .cmp(&(other.quote_asset_id, other.base_asset_id))
            .then_with(|| {
                // Cross-multiply in u128 to compare ratios without floating point.
                let lhs = (self.numerator as u128) * (other.denominator as u128);
                let rhs = (other.numerator as u128) * (self.denominator as u128);
                lhs.cmp(&rhs)
            })
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// `floor(amount * num / den)`, widened through `u128` so the intermediate
/// product never overflows even for the largest representable shares/prices.
/// `amount` is expected non-negative; see callers.
fn widened_mul_div(amount: Shares, num: u64, den: u64) -> Shares {
    debug_assert!(amount >= 0, "widened_mul_div expects a non-negative amount");
    debug_assert!(den != 0, "widened_mul_div division by zero");
    let product = (amount as u128) * (num as u128);
    (product / (den as u128)) as Shares
}
