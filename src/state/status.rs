use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::EngineError;
use crate::quantities::{AssetId, Price};

/// Written once after every `execute` call, success or failure — `spec.md`
/// §3. Reworked from the teacher's `MarketStatus` enum (which models a
/// market's admin lifecycle: `Active`/`Paused`/`Closed`/...) into a struct
/// carrying the last execution's diagnostic, since this spec has no such
/// lifecycle to track.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct MarketStatus {
    pub quote_id: AssetId,
    pub base_id: AssetId,
    pub last_error: Option<EngineError>,
    /// Carried for wire-compatibility with the vestigial market-issued-asset
    /// path; never written by the active pass (`spec.md` §4.1, §9).
    pub last_valid_feed_price: Option<Price>,
}

impl MarketStatus {
    pub fn new(quote_id: AssetId, base_id: AssetId) -> Self {
        MarketStatus {
            quote_id,
            base_id,
            last_error: None,
            last_valid_feed_price: None,
        }
    }
}
