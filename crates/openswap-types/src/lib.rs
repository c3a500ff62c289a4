//! # openswap-types
//!
//! Shared types, errors, and configuration for the **OpenSwap** settlement
//! engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`TokenId`], [`OfferId`], [`NullifierKey`]
//! - **Offer model**: [`Offer`], [`OfferSignature`], [`SwapRequest`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`OpenswapError`] with `SW_ERR_` prefix codes
//! - **Constants**: the fixed-point [`constants::SCALE`] and friends

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod offer;

// Re-export all primary types at crate root for ergonomic imports:
//   use openswap_types::{Offer, OfferSignature, Address, ...};

pub use config::*;
pub use error::*;
pub use ids::*;
pub use offer::*;

// Constants are accessed via `openswap_types::constants::SCALE`
// (not re-exported to avoid name collisions).
