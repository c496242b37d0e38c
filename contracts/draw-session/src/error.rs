use cosmwasm_std::StdError;
use raffle_common::{SetupError, Stage, TransitionError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("transition refused: {0}")]
    Transition(#[from] TransitionError),

    #[error("invalid setup: {0}")]
    Setup(#[from] SetupError),

    #[error("setup can only be edited before the game begins (stage: {stage})")]
    SetupLocked { stage: Stage },

    #[error("invalid hex input: {field}")]
    InvalidHex { field: String },

    #[error("no award advance is pending")]
    NoPendingAdvance,

    #[error("award advance not due until {due_at}")]
    AdvanceNotDue { due_at: u64 },
}
