//! Error taxonomy for the engine.
//!
//! Errors fall into four groups: invalid input, invalid state, ledger
//! failures, and policy aborts. Every error aborts the public call that
//! raised it and rolls the engine back to its pre-call state; there are no
//! warning paths and no partially applied calls.

use thiserror::Error;

use crate::types::{Amount, OrderId};

/// Top-level engine error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Fill-or-kill order left a positive unfilled remainder
    #[error("fill-or-kill order could not be completely filled")]
    FillOrKillNotFilled,

    /// A widened product could not be narrowed back to 128 bits
    #[error("amount arithmetic overflowed 128 bits")]
    AmountOverflow,
}

/// Rejected caller input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("token amounts must be positive")]
    ZeroTokenAmount,

    #[error("selling-token flag must be 0 or 1, got {value}")]
    SellingTokenNotBool { value: u8 },

    #[error("buy quantity must be positive")]
    ZeroBuyQuantity,

    #[error("quantity {requested} exceeds order inventory {available}")]
    QuantityExceedsOrderAmount {
        requested: Amount,
        available: Amount,
    },

    #[error("fee of {bps} bps exceeds the 5000 bps cap")]
    InvalidFeeValue { bps: u32 },
}

/// Operation incompatible with current engine state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("order {0} is not active")]
    InactiveOrder(OrderId),

    #[error("order {0} can only be cancelled by its owner")]
    NonOwnerCantCancelOrder(OrderId),

    #[error("fee parameters can only be changed by the administrator")]
    NotAdmin,
}

/// A ledger movement reported failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("transfer of the sold amount into escrow failed")]
    TransferToEscrowError,

    #[error("taker lacks funds for the fee payment")]
    LackingFundsForFees,

    #[error("taker lacks funds for the trade payment")]
    LackingFundsForTransaction,

    #[error("transfer out of escrow failed")]
    EscrowToBuyerError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = InputError::QuantityExceedsOrderAmount {
            requested: 10,
            available: 5,
        };
        assert_eq!(err.to_string(), "quantity 10 exceeds order inventory 5");

        let err = StateError::InactiveOrder(7);
        assert_eq!(err.to_string(), "order 7 is not active");
    }

    #[test]
    fn test_engine_error_from_groups() {
        let err: EngineError = InputError::ZeroTokenAmount.into();
        assert!(matches!(err, EngineError::Input(_)));

        let err: EngineError = StateError::NotAdmin.into();
        assert!(matches!(err, EngineError::State(_)));

        let err: EngineError = LedgerError::TransferToEscrowError.into();
        assert!(matches!(err, EngineError::Ledger(_)));
    }
}
