use thiserror::Error;

use crate::{Action, GamePhase};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("deck exhausted")]
    DeckExhausted,
    #[error("not allowed during {actual:?} (expected {expected:?})")]
    InvalidPhase {
        expected: GamePhase,
        actual: GamePhase,
    },
    #[error("cannot bet {amount} with {chips} chips")]
    InvalidBet { amount: u64, chips: u64 },
    #[error("cannot double down")]
    CannotDouble,
    #[error("cannot {0} with the current hand")]
    IllegalAction(Action),
    #[error("invalid card: {0}")]
    InvalidCard(String),
    #[error("invalid payout ratio: {0}")]
    InvalidPayout(String),
}

pub type Result<T> = std::result::Result<T, Error>;
