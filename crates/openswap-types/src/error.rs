//! Error types for the OpenSwap settlement engine.
//!
//! All errors use the `SW_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Validation errors (rejected before any state is touched)
//! - 2xx: Nullifier state errors (monotonic invariant violations)
//! - 3xx: Transfer errors (asset movement failed; call rolls back)
//! - 4xx: Flash callback errors
//! - 9xx: General / internal errors
//!
//! Every error is fatal to the enclosing settlement call: there is no
//! partial commit and no internal retry. Notably absent is any "bad
//! signature" variant — malformed signatures recover to an identity that
//! fails authorization naturally, they never raise.

use thiserror::Error;

/// Central error enum for all OpenSwap operations.
#[derive(Debug, Error)]
pub enum OpenswapError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// The offer's expiration timestamp has passed.
    #[error("SW_ERR_100: Offer expired at {expiration}, now is {now}")]
    OfferExpired { expiration: u64, now: u64 },

    /// The requested fill fraction exceeds 100% (SCALE).
    #[error("SW_ERR_101: Requested part {part} exceeds SCALE")]
    PartExceedsScale { part: u128 },

    /// An order size is too large to multiply by SCALE without overflow.
    #[error("SW_ERR_102: Amount {amount} too large for fixed-point scaling")]
    AmountUnscalable { amount: u128 },

    // =================================================================
    // Nullifier State Errors (2xx)
    // =================================================================
    /// Attempt to decrease a stored filled fraction ("resurrection").
    #[error("SW_ERR_200: Fraction resurrection: stored {current}, requested {requested}")]
    FractionDecrease { current: u128, requested: u128 },

    /// Attempt to raise a filled fraction above SCALE ("over-nullification").
    #[error("SW_ERR_201: Fraction {requested} exceeds SCALE")]
    FractionAboveScale { requested: u128 },

    // =================================================================
    // Transfer Errors (3xx)
    // =================================================================
    /// The underlying asset movement failed.
    #[error("SW_ERR_300: Transfer of {token} failed: {reason}")]
    TransferFailed { token: crate::TokenId, reason: String },

    /// Not enough balance on the owner's account for the transfer.
    #[error("SW_ERR_301: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    /// The owner has not approved enough capacity to the spender.
    #[error("SW_ERR_302: Insufficient allowance: need {needed}, have {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    // =================================================================
    // Flash Callback Errors (4xx)
    // =================================================================
    /// The caller-supplied flash callback returned an error.
    #[error("SW_ERR_400: Flash callback failed: {reason}")]
    FlashCallbackFailed { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("SW_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, OpenswapError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TokenId;

    #[test]
    fn error_display_contains_prefix() {
        let err = OpenswapError::OfferExpired {
            expiration: 100,
            now: 200,
        };
        let msg = format!("{err}");
        assert!(msg.starts_with("SW_ERR_100"), "Got: {msg}");
    }

    #[test]
    fn fraction_decrease_display() {
        let err = OpenswapError::FractionDecrease {
            current: 500,
            requested: 400,
        };
        let msg = format!("{err}");
        assert!(msg.contains("SW_ERR_200"));
        assert!(msg.contains("500"));
        assert!(msg.contains("400"));
    }

    #[test]
    fn all_errors_have_sw_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(OpenswapError::PartExceedsScale { part: 1 }),
            Box::new(OpenswapError::AmountUnscalable { amount: u128::MAX }),
            Box::new(OpenswapError::FractionAboveScale { requested: 2 }),
            Box::new(OpenswapError::TransferFailed {
                token: TokenId([0u8; 20]),
                reason: "test".into(),
            }),
            Box::new(OpenswapError::FlashCallbackFailed {
                reason: "test".into(),
            }),
            Box::new(OpenswapError::Internal("test".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("SW_ERR_"),
                "Error missing SW_ERR_ prefix: {msg}"
            );
        }
    }
}
