use borsh::{BorshDeserialize, BorshSerialize};
use thiserror::Error;

/// Fatal conditions raised while clearing a single market. Every variant
/// tears down the pending overlay for the market that raised it; other
/// markets in the same block are unaffected. `Borsh`-derived so a captured
/// error can be persisted verbatim in `MarketStatus::last_error`, matching
/// `market_status::last_error` holding a serialized `fc::exception` in
/// `original_source`.
#[derive(Debug, Error, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum EngineError {
    #[error("asset {0:?} does not exist or its market is halted")]
    InvalidMarket(crate::quantities::AssetId),

    #[error("no valid feed price available for a market-issued asset")]
    InsufficientFeeds,

    #[error("matching loop made no progress: orders_filled did not increase")]
    MatchingLoopStuck,

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Returns `Err(EngineError::InvariantViolation(..))` built from `format!`
/// args if `cond` is false, mirroring the teacher's `assert_with_msg` but
/// producing a `Result` instead of aborting the instruction.
#[track_caller]
pub fn ensure(cond: bool, msg: impl Into<String>) -> Result<(), EngineError> {
    if cond {
        Ok(())
    } else {
        let caller = std::panic::Location::caller();
        Err(EngineError::InvariantViolation(format!(
            "{} ({})",
            msg.into(),
            caller
        )))
    }
}
