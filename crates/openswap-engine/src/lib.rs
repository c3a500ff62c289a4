//! # openswap-engine
//!
//! The OpenSwap **settlement engine**: redeems maker-signed offers,
//! partially and repeatedly, until they are fully consumed or cancelled.
//!
//! ## Architecture
//!
//! A settlement call flows through four components:
//! 1. [`codec`] hashes the offer's economic terms under this instance's
//!    domain-separation identity
//! 2. [`verifier`] recovers the maker from the signature (total — garbage
//!    input recovers to the zero address, never an error)
//! 3. [`nullifier`] commits the monotonic filled-fraction update, the sole
//!    guard against double-redeeming the same offer
//! 4. the [`engine`] drives the two-leg transfer on the [`ledger`] seam,
//!    optionally interleaved with a flash callback between the legs
//!
//! Every mutating call is one atomic unit: on any failure the nullifier
//! update and every transfer already performed are rolled back together.

pub mod codec;
pub mod engine;
pub mod ledger;
pub mod nullifier;
pub mod verifier;

pub use engine::{FlashCallee, SettlementEngine};
pub use ledger::{AssetLedger, InMemoryLedger};
pub use nullifier::NullifierStore;
