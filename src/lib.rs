//! A deterministic order book matching and settlement engine for a single
//! (quote, base) asset market.
//!
//! The engine clears bids against asks in strict price order, settles the
//! matched funds through a pending state overlay, levies per-asset issuer
//! fees, and rolls the result up into per-block/hour/day history records.
//! `execute` is atomic: on success the overlay merges into the caller's
//! chain state store and the produced [`state::MarketTransaction`] list is
//! readable back off the engine; on failure the overlay is discarded and a
//! [`state::MarketStatus`] carrying the error is written instead.
//!
//! Transaction submission, wallets, consensus, block production, P2P
//! networking, and any scripting/interpreter subsystem are external
//! collaborators; this crate only implements the trait boundary in
//! [`store`] against which those collaborators are expected to integrate.

#[macro_use]
mod log;

pub mod engine;
pub mod error;
pub mod quantities;
pub mod state;
pub mod store;

pub use engine::MatchingEngine;
pub use error::EngineError;
pub use store::ChainStateStore;
