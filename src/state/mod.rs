pub mod address;
pub mod asset;
pub mod balance;
pub mod history;
pub mod order;
pub mod status;
pub mod transaction;

pub use address::Address;
pub use asset::{AssetRecord, Whitelist};
pub use balance::BalanceRecord;
pub use history::{Granularity, MarketHistoryKey, MarketHistoryRecord};
pub use order::{MarketIndexKey, OrderState, Side};
pub use status::MarketStatus;
pub use transaction::MarketTransaction;
