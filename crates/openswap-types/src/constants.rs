//! System-wide constants for the OpenSwap settlement engine.

/// Fixed-point denominator: `SCALE` represents 100% of an offer filled.
/// All fill fractions are integers in `[0, SCALE]`.
pub const SCALE: u128 = 1_000_000_000_000_000_000;

/// Largest order size that can be scaled without overflowing u128.
/// Amounts above this bound are rejected before any fixed-point
/// multiplication is attempted.
pub const MAX_SCALABLE_AMOUNT: u128 = u128::MAX / SCALE;

/// Domain tag mixed into every offer hash, versioned so future encoding
/// changes cannot collide with v1 signatures.
pub const OFFER_DOMAIN_TAG: &[u8] = b"openswap:offer:v1:";

/// Domain tag for nullifier keys.
pub const NULLIFIER_DOMAIN_TAG: &[u8] = b"openswap:nullifier:v1:";

/// Prefix of the standard "signed message" convention applied before
/// public-key recovery (the 32 is the length of the offer hash).
pub const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenSwap";
