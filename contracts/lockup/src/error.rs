use cosmwasm_std::{OverflowError, StdError, Timestamp, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Insufficient {denom} funds: required {required}, available {available}")]
    InsufficientFunds {
        denom: String,
        required: Uint128,
        available: Uint128,
    },

    #[error("Lock {id} not found")]
    LockNotFound { id: u64 },

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Lock {id} is not unlockable until {end_time}")]
    NotUnlockable { id: u64, end_time: Timestamp },

    /// Broken invariant; the enclosing operation must not be committed.
    #[error("Fatal: {reason}")]
    Fatal { reason: String },
}

impl ContractError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        ContractError::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub fn fatal(reason: impl Into<String>) -> Self {
        ContractError::Fatal {
            reason: reason.into(),
        }
    }
}
