//! Settlement engine — validation, clamping, nullifier commit, and the
//! two-leg exchange.
//!
//! Both entry points ([`swap`](SettlementEngine::swap) and
//! [`composed_swap`](SettlementEngine::composed_swap)) run the same
//! pipeline:
//!
//! 1. Reject amounts too large for fixed-point scaling (before any
//!    multiplication)
//! 2. Reject expired offers
//! 3. Recover the maker from the signature (total, no failure mode)
//! 4. Reject `part > SCALE`
//! 5. Clamp `part` to the remaining capacity `SCALE - current`
//! 6. Commit the nullifier update (the monotonic guard re-checks it)
//! 7. Transfer `amount0 · part / SCALE` of token0, maker → taker
//! 8. Transfer `amount1 · part / SCALE` of token1, taker → maker
//! 9. Return the executed part — zero-clamped calls succeed as no-ops
//!
//! The composed variant invokes the flash callback between legs 7 and 8,
//! letting the taker use the just-received token0 before paying token1.
//! Each call is one atomic unit: a checkpoint of the nullifier store and
//! the ledger is taken up front and restored on any failure, callback
//! included. The callback may reenter the engine; reentrant calls commit
//! inside the outer unit and are undone with it if the outer call fails.

use openswap_types::constants::{MAX_SCALABLE_AMOUNT, SCALE};
use openswap_types::{
    Address, EngineConfig, Offer, OfferId, OfferSignature, OpenswapError, Result, SwapRequest,
};

use crate::codec;
use crate::ledger::AssetLedger;
use crate::nullifier::NullifierStore;
use crate::verifier;

/// Caller-supplied callback invoked mid-settlement for composed swaps.
///
/// By the time the callback returns, the taker must hold sufficient
/// approved token1 capacity for the pending second-leg transfer, or the
/// overall call fails and rolls back.
pub trait FlashCallee<L: AssetLedger> {
    /// Invoked after the taker has received token0 and before token1 is
    /// collected. Receives the engine itself and may reenter it.
    fn flash_callback(&mut self, engine: &mut SettlementEngine<L>, data: &[u8]) -> Result<()>;
}

/// Orchestrates offer validation, partial-fill accounting, and the
/// two-leg asset exchange over a caller-supplied ledger.
pub struct SettlementEngine<L: AssetLedger> {
    /// Instance identity: domain separation for all offer hashes.
    config: EngineConfig,
    /// Monotonic filled-fraction state, the double-spend guard.
    nullifier: NullifierStore,
    /// The external transfer primitive.
    ledger: L,
}

impl<L: AssetLedger> SettlementEngine<L> {
    /// Create an engine with the given instance identity and ledger.
    #[must_use]
    pub fn new(config: EngineConfig, ledger: L) -> Self {
        Self {
            config,
            nullifier: NullifierStore::new(),
            ledger,
        }
    }

    /// The instance identity mixed into every signed offer hash.
    #[must_use]
    pub fn instance(&self) -> Address {
        self.config.instance
    }

    /// Canonical hash of an offer under this instance's identity — the
    /// digest off-channel signing tooling must produce.
    #[must_use]
    pub fn offer_hash(&self, offer: &Offer) -> [u8; 32] {
        codec::offer_hash(self.config.instance, offer)
    }

    /// Raw signature recovery for debugging and tooling. The returned
    /// identity is untrusted; malformed input yields the zero address.
    #[must_use]
    pub fn recover_maker(&self, offer: &Offer, signature: &OfferSignature) -> Address {
        verifier::recover(&self.offer_hash(offer), signature)
    }

    /// Filled fraction for `(maker, offer_id)`, in `[0, SCALE]`.
    #[must_use]
    pub fn filled(&self, maker: Address, offer_id: OfferId) -> u128 {
        self.nullifier.get(&codec::nullifier_key(maker, offer_id))
    }

    /// Read-only pre-screen: `true` iff the offer is not expired, the
    /// recovered maker still has unfilled capacity, and the maker has
    /// approved at least `amount0` of token0 to this instance.
    ///
    /// Total: never errors, even on a malformed signature — a bad
    /// signature recovers to an identity that fails the checks below.
    #[must_use]
    pub fn is_valid(&self, offer: &Offer, signature: &OfferSignature, now: u64) -> bool {
        if offer.is_expired(now) {
            return false;
        }
        let maker = self.recover_maker(offer, signature);
        if self.filled(maker, offer.offer_id) >= SCALE {
            return false;
        }
        self.ledger
            .allowance(offer.token0, maker, self.config.instance)
            >= offer.amount0
    }

    /// Settle `part` of `offer` for `taker`. Returns the fraction actually
    /// executed, which may be clamped below `part` (down to zero) by the
    /// offer's remaining capacity.
    pub fn swap(
        &mut self,
        part: u128,
        offer: &Offer,
        signature: &OfferSignature,
        taker: Address,
        now: u64,
    ) -> Result<u128> {
        self.settle(part, offer, signature, taker, now, None)
    }

    /// Settle a composed ("flash") swap: token0 is delivered first, the
    /// callback runs (if `flash_data` is non-empty), then token1 is
    /// collected. Any failure rolls back the whole call, the already
    /// performed token0 leg and the nullifier update included.
    pub fn composed_swap(
        &mut self,
        request: &SwapRequest,
        flash_data: &[u8],
        callee: &mut dyn FlashCallee<L>,
        taker: Address,
        now: u64,
    ) -> Result<u128> {
        self.settle(
            request.part,
            &request.offer,
            &request.signature,
            taker,
            now,
            Some((callee, flash_data)),
        )
    }

    /// Cancel the caller's own offer by forcing its fraction to `SCALE`.
    ///
    /// Always permitted: `SCALE` is the maximum, so the monotonic guard
    /// can only see a non-decrease. Subsequent swaps clamp to zero.
    pub fn cancel_offer(&mut self, caller: Address, offer_id: OfferId) -> Result<()> {
        self.nullifier
            .set(codec::nullifier_key(caller, offer_id), SCALE)?;
        tracing::info!(maker = %caller, offer = %offer_id, "Offer cancelled");
        Ok(())
    }

    /// Access the underlying ledger.
    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable access to the underlying ledger (funding, approvals — and
    /// the handle a flash callee uses to arrange its token1 payment).
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// One atomic settlement unit shared by both entry points.
    fn settle(
        &mut self,
        part: u128,
        offer: &Offer,
        signature: &OfferSignature,
        taker: Address,
        now: u64,
        flash: Option<(&mut dyn FlashCallee<L>, &[u8])>,
    ) -> Result<u128> {
        // Steps 1-4 touch no state, so they need no rollback protection.
        if offer.amount0 > MAX_SCALABLE_AMOUNT {
            return Err(OpenswapError::AmountUnscalable {
                amount: offer.amount0,
            });
        }
        if offer.amount1 > MAX_SCALABLE_AMOUNT {
            return Err(OpenswapError::AmountUnscalable {
                amount: offer.amount1,
            });
        }
        if offer.is_expired(now) {
            return Err(OpenswapError::OfferExpired {
                expiration: offer.expiration,
                now,
            });
        }
        let maker = self.recover_maker(offer, signature);
        if part > SCALE {
            return Err(OpenswapError::PartExceedsScale { part });
        }

        let ledger_cp = self.ledger.checkpoint();
        let nullifier_cp = self.nullifier.snapshot();

        match self.execute(part, offer, maker, taker, flash) {
            Ok(executed) => {
                tracing::info!(
                    maker = %maker,
                    taker = %taker,
                    offer = %offer.offer_id,
                    requested = part,
                    executed,
                    "Swap settled"
                );
                Ok(executed)
            }
            Err(err) => {
                self.nullifier.restore(nullifier_cp);
                self.ledger.rollback(ledger_cp);
                tracing::warn!(
                    maker = %maker,
                    taker = %taker,
                    offer = %offer.offer_id,
                    error = %err,
                    "Settlement rolled back"
                );
                Err(err)
            }
        }
    }

    /// Steps 5-9. Runs inside the checkpointed unit; any `Err` from here
    /// triggers a full rollback in `settle`.
    fn execute(
        &mut self,
        part: u128,
        offer: &Offer,
        maker: Address,
        taker: Address,
        flash: Option<(&mut dyn FlashCallee<L>, &[u8])>,
    ) -> Result<u128> {
        let key = codec::nullifier_key(maker, offer.offer_id);
        let current = self.nullifier.get(&key);

        // Optimistic clamping: execute as much as remains rather than
        // failing the whole call. Zero remaining is a successful no-op.
        let executed = part.min(SCALE - current);
        self.nullifier.set(key, current + executed)?;

        if executed == 0 {
            tracing::debug!(maker = %maker, offer = %offer.offer_id, "Offer exhausted, no-op");
            return Ok(0);
        }
        if executed < part {
            tracing::debug!(
                maker = %maker,
                offer = %offer.offer_id,
                requested = part,
                executed,
                "Fill clamped to remaining capacity"
            );
        }

        // Bounds were checked before any state was touched, so neither
        // product can overflow; division truncates toward zero and the
        // resulting dust stays with the owner.
        let fill0 = offer.amount0 * executed / SCALE;
        let fill1 = offer.amount1 * executed / SCALE;

        if fill0 > 0 {
            self.ledger
                .transfer_from(offer.token0, maker, taker, fill0)?;
        }

        if let Some((callee, data)) = flash {
            if !data.is_empty() {
                callee
                    .flash_callback(self, data)
                    .map_err(|err| OpenswapError::FlashCallbackFailed {
                        reason: err.to_string(),
                    })?;
            }
        }

        if fill1 > 0 {
            self.ledger
                .transfer_from(offer.token1, taker, maker, fill1)?;
        }

        Ok(executed)
    }
}
