//! Signature recovery — total, never-failing identity extraction.
//!
//! `recover` applies the standard signed-message convention (prefix +
//! keccak) and then secp256k1 public-key recovery. It deliberately has no
//! failure mode: malformed signatures recover to [`Address::ZERO`], an
//! identity that can hold no funds and no approvals, so bad input fails
//! at the authorization checks downstream instead of raising here. This
//! keeps the read-only validity check total.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use openswap_types::constants::SIGNED_MESSAGE_PREFIX;
use openswap_types::{Address, OfferSignature};
use sha3::{Digest, Keccak256};

/// The digest actually signed by makers:
/// `keccak256(SIGNED_MESSAGE_PREFIX || offer_hash)`.
#[must_use]
pub fn signed_message_digest(offer_hash: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(SIGNED_MESSAGE_PREFIX);
    hasher.update(offer_hash);
    hasher.finalize().into()
}

/// Recover the claimed signer of `offer_hash`.
///
/// Returns whatever identity the math yields — callers must treat it as
/// untrusted until corroborated by allowance and fill-state checks.
/// Returns [`Address::ZERO`] when the signature is not recoverable at all.
#[must_use]
pub fn recover(offer_hash: &[u8; 32], signature: &OfferSignature) -> Address {
    let digest = signed_message_digest(offer_hash);

    let Some(recovery_id) = normalize_v(signature.v) else {
        return Address::ZERO;
    };
    let Ok(sig) = Signature::from_scalars(signature.r, signature.s) else {
        return Address::ZERO;
    };
    match VerifyingKey::recover_from_prehash(&digest, &sig, recovery_id) {
        Ok(key) => address_of(&key),
        Err(_) => Address::ZERO,
    }
}

/// Derive the 20-byte address of a public key: the last 20 bytes of the
/// keccak of the uncompressed point (without the 0x04 tag byte).
#[must_use]
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let digest = Keccak256::digest(&point.as_bytes()[1..]);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest[12..]);
    Address(out)
}

/// Accept both raw recovery ids (0/1) and the legacy 27/28 convention.
fn normalize_v(v: u8) -> Option<RecoveryId> {
    let byte = match v {
        27 | 28 => v - 27,
        0 | 1 => v,
        _ => return None,
    };
    RecoveryId::from_byte(byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;

    fn sign(key: &SigningKey, offer_hash: &[u8; 32]) -> OfferSignature {
        let digest = signed_message_digest(offer_hash);
        let (sig, recid) = key
            .sign_prehash_recoverable(&digest)
            .expect("signing a fixed digest cannot fail");
        let bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        OfferSignature {
            r,
            s,
            v: recid.to_byte(),
        }
    }

    #[test]
    fn recovers_the_signer() {
        let key = SigningKey::random(&mut rand::thread_rng());
        let expected = address_of(key.verifying_key());
        let hash = [0x5au8; 32];

        let sig = sign(&key, &hash);
        assert_eq!(recover(&hash, &sig), expected);
    }

    #[test]
    fn accepts_legacy_v_convention() {
        let key = SigningKey::random(&mut rand::thread_rng());
        let expected = address_of(key.verifying_key());
        let hash = [0x5au8; 32];

        let mut sig = sign(&key, &hash);
        sig.v += 27;
        assert_eq!(recover(&hash, &sig), expected);
    }

    #[test]
    fn wrong_hash_recovers_a_different_identity() {
        let key = SigningKey::random(&mut rand::thread_rng());
        let expected = address_of(key.verifying_key());

        let sig = sign(&key, &[0x5au8; 32]);
        let recovered = recover(&[0x5bu8; 32], &sig);
        assert_ne!(recovered, expected);
    }

    #[test]
    fn malformed_signatures_never_panic() {
        let hash = [7u8; 32];

        // Out-of-range recovery byte.
        let sig = OfferSignature {
            r: [1u8; 32],
            s: [1u8; 32],
            v: 5,
        };
        assert_eq!(recover(&hash, &sig), Address::ZERO);

        // Zero scalars are not a valid signature.
        let sig = OfferSignature {
            r: [0u8; 32],
            s: [0u8; 32],
            v: 0,
        };
        assert_eq!(recover(&hash, &sig), Address::ZERO);

        // Scalars above the curve order.
        let sig = OfferSignature {
            r: [0xff; 32],
            s: [0xff; 32],
            v: 1,
        };
        assert_eq!(recover(&hash, &sig), Address::ZERO);
    }

    #[test]
    fn prefix_changes_the_signed_digest() {
        let hash = [9u8; 32];
        let digest = signed_message_digest(&hash);
        assert_ne!(digest, hash);
        assert_eq!(digest, signed_message_digest(&hash));
    }
}
