use thiserror::Error;

use crate::types::Stage;

/// A command that the current session state cannot accept. The state the
/// command was applied to is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("command {command} is not valid in stage {stage}")]
    InvalidStage { command: String, stage: Stage },

    #[error("participant {id} is not in the remaining pool")]
    NotInPool { id: String },

    #[error("no winner is awaiting a decision")]
    NoCurrentWinner,

    #[error("no prize at index {index}")]
    NoCurrentPrize { index: usize },

    #[error("the game is over")]
    GameOver,

    #[error("the remaining pool is empty")]
    EmptyPool,
}

/// Setup input that must be fixed before a game can begin.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("at least {min} participants are required, got {got}")]
    NotEnoughParticipants { min: usize, got: usize },

    #[error("at least one prize is required")]
    NoPrizes,

    #[error("{prizes} prizes exceed {participants} participants")]
    TooManyPrizes { prizes: usize, participants: usize },

    #[error("duplicate id: {id}")]
    DuplicateId { id: String },

    #[error("{kind} name must not be blank")]
    BlankName { kind: String },

    #[error("{kind} {id} not found")]
    NotFound { kind: String, id: String },
}

/// Failure to persist a snapshot. Callers log it and keep running on the
/// in-memory session.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] cosmwasm_std::StdError),

    #[error("snapshot write failed: {reason}")]
    Write { reason: String },
}
