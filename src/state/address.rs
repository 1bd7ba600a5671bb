use borsh::{BorshDeserialize, BorshSerialize};
use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

/// Owner address. The spec treats addresses as opaque; a 32-byte array is
/// the teacher's representation for any chain-level identity (`Pubkey`).
#[repr(C)]
#[derive(
    Eq, PartialEq, Ord, PartialOrd, Debug, Default, Copy, Clone, Hash, Zeroable, Pod,
    BorshSerialize, BorshDeserialize,
)]
pub struct Address(pub [u8; 32]);

impl Address {
    pub const fn zero() -> Self {
        Address([0u8; 32])
    }
}

impl From<[u8; 32]> for Address {
    fn from(v: [u8; 32]) -> Self {
        Address(v)
    }
}

const_assert_eq!(std::mem::size_of::<Address>(), 32);
