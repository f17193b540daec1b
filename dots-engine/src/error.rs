use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The target cell is out of bounds or not empty. The board is untouched.
    InvalidMove,
    /// The move search widened past twice the larger board dimension without
    /// finding a candidate. Unreachable when the caller pre-checks availability.
    SearchAreaExhausted,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidMove => write!(f, "invalid move"),
            GameError::SearchAreaExhausted => write!(f, "search area exhausted"),
        }
    }
}

impl std::error::Error for GameError {}
