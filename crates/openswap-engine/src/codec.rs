//! Canonical offer encoding and hashing.
//!
//! Every field is serialized at a fixed width in big-endian order under a
//! versioned domain tag, so the encoding is unambiguous without length
//! prefixes and the hash changes if any single field changes. The
//! settlement instance's own address is the first field: the same signed
//! offer can never be replayed against a different instance.

use openswap_types::constants::{NULLIFIER_DOMAIN_TAG, OFFER_DOMAIN_TAG};
use openswap_types::{Address, NullifierKey, Offer, OfferId};
use sha3::{Digest, Keccak256};

/// Keccak-256 of the canonical encoding of
/// `(instance, offer_id, token0, token1, amount0, amount1, expiration)`.
///
/// Pure and deterministic; this is the exact digest makers sign
/// (after the signed-message prefix applied by the verifier).
#[must_use]
pub fn offer_hash(instance: Address, offer: &Offer) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(OFFER_DOMAIN_TAG);
    hasher.update(instance.as_bytes());
    hasher.update(offer.offer_id.0.to_be_bytes());
    hasher.update(offer.token0.as_bytes());
    hasher.update(offer.token1.as_bytes());
    hasher.update(offer.amount0.to_be_bytes());
    hasher.update(offer.amount1.to_be_bytes());
    hasher.update(offer.expiration.to_be_bytes());
    hasher.finalize().into()
}

/// Collision-resistant key for the filled-fraction store:
/// Keccak-256 of `(maker, offer_id)` under its own domain tag.
#[must_use]
pub fn nullifier_key(maker: Address, offer_id: OfferId) -> NullifierKey {
    let mut hasher = Keccak256::new();
    hasher.update(NULLIFIER_DOMAIN_TAG);
    hasher.update(maker.as_bytes());
    hasher.update(offer_id.0.to_be_bytes());
    NullifierKey(hasher.finalize().into())
}
