//! Domain error taxonomy. Every failure is scoped to the single operation
//! attempted and leaves game state unchanged; nothing here is fatal.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GambitError {
    // Invalid input
    #[error("invalid move: {0}")]
    InvalidMove(String),

    #[error("invalid allocation: {0}")]
    InvalidAllocation(String),

    #[error("invalid retreat target: {0}")]
    InvalidRetreat(String),

    // Invalid state
    #[error("no duel is pending")]
    NoPendingDuel,

    #[error("a duel is already pending")]
    DuelAlreadyPending,

    #[error("{0} has already allocated for this duel")]
    AlreadyAllocated(String),

    #[error("player is not a participant in the pending duel")]
    NotADuelParticipant,

    #[error("no failed-capture retreat is pending")]
    NoPendingRetreat,

    #[error("it is not {0}'s turn")]
    NotYourTurn(String),

    #[error("the game is over")]
    GameOver,

    // Resource exhaustion, reported as a normal rejection
    #[error("insufficient BP: need {required}, have {available}")]
    InsufficientBp { required: u32, available: u32 },

    #[error("invalid position: {0}")]
    InvalidPosition(String),
}
