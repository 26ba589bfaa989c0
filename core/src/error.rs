use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid position")]
    InvalidPosition,
    #[error("Board needs at least one row and one column")]
    InvalidDimensions,
    #[error("Cannot sample {requested} distinct values, only {available} available")]
    InvalidSampleRequest {
        requested: CellCount,
        available: CellCount,
    },
    #[error("Too many mines")]
    TooManyMines,
    #[error("Game has not been started")]
    NotStarted,
}

pub type Result<T> = core::result::Result<T, GameError>;
