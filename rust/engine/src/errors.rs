use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cannot draw from an empty deck")]
    EmptyDeck,
    #[error("Card index {index} is out of range for a hand of {len}")]
    InvalidIndex { index: usize, len: usize },
    #[error("Card at index {index} is already locked")]
    AlreadyLocked { index: usize },
    #[error("Card at index {index} is locked and cannot be exchanged")]
    LockedCard { index: usize },
    #[error("Hand already holds the maximum number of cards")]
    HandFull,
    #[error("Action is not allowed during {phase}")]
    OutOfTurn { phase: String },
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

impl GameError {
    /// True for failures that indicate an engine bug rather than a rejected
    /// user action.
    pub fn is_engine_fault(&self) -> bool {
        matches!(self, GameError::EmptyDeck | GameError::InvariantViolation(_))
    }
}
