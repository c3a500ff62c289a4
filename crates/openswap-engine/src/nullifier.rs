//! Nullifier store — the monotonic filled-fraction record.
//!
//! Like a blockchain nullifier set: each (maker, offer) key maps to how
//! much of the offer has been consumed or cancelled, as a fraction of
//! `SCALE`. The value starts at 0, only ever increases, and is capped at
//! `SCALE`. This single invariant is what prevents double-spending an
//! offer across concurrent redemptions: whichever call commits first
//! claims the capacity, and any attempt to move the value backwards
//! ("resurrection") or past the cap hard-fails.
//!
//! There is no deletion and no teardown — a key at `SCALE` is terminal.

use std::collections::HashMap;

use openswap_types::constants::SCALE;
use openswap_types::{NullifierKey, OpenswapError, Result};

/// Durable mapping from nullifier key to filled fraction.
///
/// The guarded [`set`](Self::set) is the only public write path.
#[derive(Debug, Default)]
pub struct NullifierStore {
    /// Filled fraction per (maker, offer) key. Absent means 0.
    filled: HashMap<NullifierKey, u128>,
}

/// Opaque point-in-time copy of the store, used by the engine to make a
/// whole settlement call atomic.
#[derive(Debug, Clone)]
pub(crate) struct NullifierSnapshot {
    filled: HashMap<NullifierKey, u128>,
}

impl NullifierStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filled: HashMap::new(),
        }
    }

    /// Current filled fraction for a key. Defaults to 0 if absent.
    #[must_use]
    pub fn get(&self, key: &NullifierKey) -> u128 {
        self.filled.get(key).copied().unwrap_or(0)
    }

    /// Commit a new filled fraction for a key.
    ///
    /// # Errors
    /// - [`OpenswapError::FractionDecrease`] if `new_fraction` is below the
    ///   stored value (resurrection)
    /// - [`OpenswapError::FractionAboveScale`] if `new_fraction > SCALE`
    ///   (over-nullification)
    pub fn set(&mut self, key: NullifierKey, new_fraction: u128) -> Result<()> {
        let current = self.get(&key);
        if new_fraction < current {
            return Err(OpenswapError::FractionDecrease {
                current,
                requested: new_fraction,
            });
        }
        if new_fraction > SCALE {
            return Err(OpenswapError::FractionAboveScale {
                requested: new_fraction,
            });
        }
        self.filled.insert(key, new_fraction);
        Ok(())
    }

    /// Whether the key has reached its terminal state (fully executed or
    /// cancelled).
    #[must_use]
    pub fn is_exhausted(&self, key: &NullifierKey) -> bool {
        self.get(key) >= SCALE
    }

    /// Number of keys ever touched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filled.len()
    }

    /// Whether no key has ever been touched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filled.is_empty()
    }

    /// Take a snapshot for the engine's transactional boundary.
    pub(crate) fn snapshot(&self) -> NullifierSnapshot {
        NullifierSnapshot {
            filled: self.filled.clone(),
        }
    }

    /// Restore a snapshot. Crate-private: only the engine's rollback path
    /// may bypass the monotonic guard, and only to undo its own unit.
    pub(crate) fn restore(&mut self, snapshot: NullifierSnapshot) {
        self.filled = snapshot.filled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> NullifierKey {
        NullifierKey([n; 32])
    }

    #[test]
    fn absent_key_defaults_to_zero() {
        let store = NullifierStore::new();
        assert_eq!(store.get(&key(1)), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn monotonic_increase_ok() {
        let mut store = NullifierStore::new();
        store.set(key(1), 100).unwrap();
        store.set(key(1), 100).unwrap(); // equal is allowed
        store.set(key(1), SCALE).unwrap();
        assert_eq!(store.get(&key(1)), SCALE);
        assert!(store.is_exhausted(&key(1)));
    }

    #[test]
    fn resurrection_rejected() {
        let mut store = NullifierStore::new();
        store.set(key(1), 500).unwrap();

        let err = store.set(key(1), 400).unwrap_err();
        assert!(
            matches!(
                err,
                OpenswapError::FractionDecrease {
                    current: 500,
                    requested: 400
                }
            ),
            "Expected FractionDecrease, got: {err:?}"
        );
        assert_eq!(store.get(&key(1)), 500, "failed set must not mutate");
    }

    #[test]
    fn over_nullification_rejected() {
        let mut store = NullifierStore::new();
        let err = store.set(key(1), SCALE + 1).unwrap_err();
        assert!(matches!(
            err,
            OpenswapError::FractionAboveScale { requested } if requested == SCALE + 1
        ));
        assert_eq!(store.get(&key(1)), 0);
    }

    #[test]
    fn terminal_state_accepts_only_scale() {
        let mut store = NullifierStore::new();
        store.set(key(1), SCALE).unwrap();

        // The only permitted write at terminal state is the identity one.
        store.set(key(1), SCALE).unwrap();
        assert!(store.set(key(1), SCALE - 1).is_err());
        assert!(store.set(key(1), SCALE + 1).is_err());
    }

    #[test]
    fn keys_are_independent() {
        let mut store = NullifierStore::new();
        store.set(key(1), SCALE).unwrap();
        assert_eq!(store.get(&key(2)), 0);
        store.set(key(2), 7).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn snapshot_restore_undoes_writes() {
        let mut store = NullifierStore::new();
        store.set(key(1), 100).unwrap();

        let snap = store.snapshot();
        store.set(key(1), 900).unwrap();
        store.set(key(2), SCALE).unwrap();

        store.restore(snap);
        assert_eq!(store.get(&key(1)), 100);
        assert_eq!(store.get(&key(2)), 0);
    }
}
