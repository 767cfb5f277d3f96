use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Raise to {amount} is below the minimum of {minimum}")]
    InvalidBetAmount { amount: u32, minimum: u32 },
    #[error("Not enough chips to raise")]
    InsufficientChips,
    #[error("No opponent is left to respond to a raise")]
    RaiseNotAllowed,
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("Hand already in progress")]
    HandAlreadyInProgress,
    #[error("Player already folded")]
    PlayerAlreadyFolded,
    #[error("Player is all-in and cannot act")]
    PlayerAllIn,
    #[error("It's not seat {actual}'s turn (expected seat {expected})")]
    NotPlayersTurn { expected: usize, actual: usize },
    #[error("No seat {0} at this table")]
    UnknownSeat(usize),
    #[error("At least two seats are required, got {0}")]
    NotEnoughPlayers(usize),
    #[error("At most {max} seats are supported, got {0}", max = crate::engine::MAX_SEATS)]
    TooManyPlayers(usize),
    #[error("Invalid blinds {small}/{big}")]
    InvalidBlinds { small: u32, big: u32 },
    #[error("Invalid card: {0:?}")]
    InvalidCard(String),
    #[error("Deck exhausted")]
    DeckExhausted,
    #[error("Table is over: fewer than two seats have chips")]
    TableOver,
}

impl GameError {
    /// Rule violations a player can trigger. These never change table state
    /// and are reported back to whoever requested the action.
    pub fn is_illegal_action(&self) -> bool {
        matches!(
            self,
            GameError::InvalidBetAmount { .. }
                | GameError::InsufficientChips
                | GameError::RaiseNotAllowed
                | GameError::PlayerAlreadyFolded
                | GameError::PlayerAllIn
                | GameError::NotPlayersTurn { .. }
                | GameError::NoHandInProgress
                | GameError::UnknownSeat(_)
        )
    }
}
