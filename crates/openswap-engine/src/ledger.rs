//! Asset ledger seam — the external transfer primitive.
//!
//! The engine never holds funds between calls; it drives value movement
//! through an [`AssetLedger`] the caller supplies. The trait carries an
//! explicit checkpoint/rollback boundary so a whole settlement call —
//! nullifier update, both transfer legs, and any flash callback between
//! them — can be undone as one unit.
//!
//! [`InMemoryLedger`] is the reference implementation: allowance-gated
//! transfers with per-(owner, token) balances, checkpointed by value.

use std::collections::HashMap;

use openswap_types::{Address, OpenswapError, Result, TokenId};

/// Conditional value transfer plus the approved-capacity query.
///
/// `transfer_from` must signal failure explicitly; any failure aborts the
/// enclosing settlement. `checkpoint`/`rollback` bound the atomic unit —
/// checkpoints are owned values, so units nest (a flash callback that
/// reenters the engine opens an inner unit inside the outer one).
pub trait AssetLedger {
    /// Point-in-time state handle used for rollback.
    type Checkpoint;

    /// Move `amount` of `token` from `owner` to `recipient`, consuming the
    /// owner's approval to the engine instance.
    fn transfer_from(
        &mut self,
        token: TokenId,
        owner: Address,
        recipient: Address,
        amount: u128,
    ) -> Result<()>;

    /// Capacity `owner` has approved `spender` to move in `token`.
    fn allowance(&self, token: TokenId, owner: Address, spender: Address) -> u128;

    /// Capture the current state.
    fn checkpoint(&self) -> Self::Checkpoint;

    /// Restore a previously captured state.
    fn rollback(&mut self, checkpoint: Self::Checkpoint);
}

/// In-memory allowance-gated ledger.
///
/// The `operator` is the settlement instance on whose behalf
/// `transfer_from` spends approvals: owners call [`approve`](Self::approve)
/// for the operator before their side of a swap can move.
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    /// The spender identity `transfer_from` acts as.
    operator: Address,
    /// Per-(owner, token) balances.
    balances: HashMap<(Address, TokenId), u128>,
    /// Per-(owner, token, spender) approved capacity.
    allowances: HashMap<(Address, TokenId, Address), u128>,
}

/// Owned copy of the ledger state at checkpoint time.
#[derive(Debug, Clone)]
pub struct InMemoryCheckpoint {
    balances: HashMap<(Address, TokenId), u128>,
    allowances: HashMap<(Address, TokenId, Address), u128>,
}

impl InMemoryLedger {
    /// Create an empty ledger operated by the given settlement instance.
    #[must_use]
    pub fn new(operator: Address) -> Self {
        Self {
            operator,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    /// Credit `amount` of `token` to `owner` out of thin air (test/funding
    /// path; a real ledger mints via deposits).
    pub fn mint(&mut self, owner: Address, token: TokenId, amount: u128) {
        *self.balances.entry((owner, token)).or_insert(0) += amount;
    }

    /// Set the capacity `owner` approves `spender` to move in `token`.
    pub fn approve(&mut self, owner: Address, token: TokenId, spender: Address, amount: u128) {
        self.allowances.insert((owner, token, spender), amount);
    }

    /// Current balance of `owner` in `token`.
    #[must_use]
    pub fn balance(&self, owner: Address, token: TokenId) -> u128 {
        self.balances.get(&(owner, token)).copied().unwrap_or(0)
    }

    /// The instance identity this ledger spends approvals for.
    #[must_use]
    pub fn operator(&self) -> Address {
        self.operator
    }
}

impl AssetLedger for InMemoryLedger {
    type Checkpoint = InMemoryCheckpoint;

    fn transfer_from(
        &mut self,
        token: TokenId,
        owner: Address,
        recipient: Address,
        amount: u128,
    ) -> Result<()> {
        let approved = self.allowance(token, owner, self.operator);
        if approved < amount {
            return Err(OpenswapError::InsufficientAllowance {
                needed: amount,
                available: approved,
            });
        }

        let held = self.balance(owner, token);
        if held < amount {
            return Err(OpenswapError::InsufficientBalance {
                needed: amount,
                available: held,
            });
        }

        self.allowances
            .insert((owner, token, self.operator), approved - amount);
        self.balances.insert((owner, token), held - amount);
        *self.balances.entry((recipient, token)).or_insert(0) += amount;
        Ok(())
    }

    fn allowance(&self, token: TokenId, owner: Address, spender: Address) -> u128 {
        self.allowances
            .get(&(owner, token, spender))
            .copied()
            .unwrap_or(0)
    }

    fn checkpoint(&self) -> InMemoryCheckpoint {
        InMemoryCheckpoint {
            balances: self.balances.clone(),
            allowances: self.allowances.clone(),
        }
    }

    fn rollback(&mut self, checkpoint: InMemoryCheckpoint) {
        self.balances = checkpoint.balances;
        self.allowances = checkpoint.allowances;
    }
}
