//! # Offer — the signature-bound settlement primitive
//!
//! An `Offer` is a maker's signed statement of willingness to exchange
//! `amount0` of `token0` for `amount1` of `token1` until `expiration`.
//! It is never persisted by the engine: it exists only as signed material
//! presented with each call, and the engine's durable state is limited to
//! the per-(maker, offer) filled fraction.
//!
//! ## Security Properties
//!
//! - **Signature-bound**: the maker authorizes the exact economic terms;
//!   any field change invalidates the signature
//! - **Domain-separated**: the settlement instance identity is part of the
//!   signed hash, so a signature cannot be replayed against another instance
//! - **Time-bound**: settlement past `expiration` is rejected outright
//! - **Partially redeemable**: takers consume fractions of the offer; the
//!   monotonic nullifier prevents redeeming more than 100%

use serde::{Deserialize, Serialize};

use crate::ids::{OfferId, TokenId};

/// Economic terms of a bilateral swap, authorized off-channel by the
/// maker's signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    /// Maker-scoped offer identifier.
    pub offer_id: OfferId,
    /// Asset the maker gives.
    pub token0: TokenId,
    /// Asset the maker receives.
    pub token1: TokenId,
    /// Full order size of `token0` (at 100% fill).
    pub amount0: u128,
    /// Full order size of `token1` (at 100% fill).
    pub amount1: u128,
    /// Unix timestamp (seconds) after which the offer is dead.
    pub expiration: u64,
}

impl Offer {
    /// Returns `true` if the offer has expired at `now` (unix seconds).
    #[must_use]
    pub fn is_expired(&self, now: u64) -> bool {
        self.expiration < now
    }
}

/// A recoverable secp256k1 signature over an offer hash.
///
/// The engine never validates this structurally: recovery is total, and
/// garbage bytes simply recover to an identity that fails authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferSignature {
    /// ECDSA `r` component.
    pub r: [u8; 32],
    /// ECDSA `s` component.
    pub s: [u8; 32],
    /// Recovery byte: 0/1, or 27/28 in the legacy convention.
    pub v: u8,
}

impl OfferSignature {
    /// Compact 65-byte wire form: `r || s || v`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// Parse the compact 65-byte wire form. Returns `None` on wrong length
    /// only; the component values themselves are never judged here.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 65 {
            return None;
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Some(Self { r, s, v: bytes[64] })
    }
}

/// A taker's settlement submission: the full signed offer plus the
/// fraction of it the taker wants to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    /// The offer being redeemed.
    pub offer: Offer,
    /// Desired fraction to execute, in `[0, SCALE]`.
    pub part: u128,
    /// The maker's signature over the offer hash.
    pub signature: OfferSignature,
}

/// Current unix timestamp in seconds, clamped at zero.
#[must_use]
pub fn now_unix() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

/// Dummy offer material for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Offer {
    /// Create a dummy offer for unit tests.
    pub fn dummy(offer_id: u64, amount0: u128, amount1: u128, expiration: u64) -> Self {
        Self {
            offer_id: OfferId::new(offer_id),
            token0: TokenId([0xaa; 20]),
            token1: TokenId([0xbb; 20]),
            amount0,
            amount1,
            expiration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_offer() -> Offer {
        Offer::dummy(1, 100, 50, 1_000)
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let offer = make_offer();
        assert!(!offer.is_expired(999));
        assert!(!offer.is_expired(1_000), "expiration == now is still live");
        assert!(offer.is_expired(1_001));
    }

    #[test]
    fn signature_wire_roundtrip() {
        let sig = OfferSignature {
            r: [1u8; 32],
            s: [2u8; 32],
            v: 27,
        };
        let bytes = sig.to_bytes();
        assert_eq!(bytes.len(), 65);
        assert_eq!(OfferSignature::from_bytes(&bytes), Some(sig));
    }

    #[test]
    fn signature_wrong_length_rejected() {
        assert!(OfferSignature::from_bytes(&[0u8; 64]).is_none());
        assert!(OfferSignature::from_bytes(&[0u8; 66]).is_none());
        assert!(OfferSignature::from_bytes(&[]).is_none());
    }

    #[test]
    fn now_unix_is_sane() {
        // 2024-01-01 as a floor; chrono won't go backwards.
        assert!(now_unix() > 1_704_067_200);
    }

    #[test]
    fn serde_roundtrip() {
        let req = SwapRequest {
            offer: make_offer(),
            part: crate::constants::SCALE / 2,
            signature: OfferSignature {
                r: [7u8; 32],
                s: [8u8; 32],
                v: 1,
            },
        };
        let json = serde_json::to_string(&req).unwrap();
        let back: SwapRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req, back);
    }
}
