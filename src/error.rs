//! Error types for game operations

use thiserror::Error;

use crate::types::Position;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid board size {size} (expected {min}..={max})")]
    InvalidBoardSize { size: usize, min: usize, max: usize },

    #[error("position {position} is outside a {size}x{size} board")]
    OutOfBounds { position: Position, size: usize },

    #[error("position {position} is already occupied")]
    CellOccupied { position: Position },

    #[error("game already over")]
    GameOver,

    #[error("unknown game session '{0}'")]
    UnknownSession(String),

    #[error("search task failed: {0}")]
    SearchTask(String),
}
