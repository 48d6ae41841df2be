use thiserror::Error;

use crate::{CellCount, Coord2};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Board must have at least one row and one column")]
    EmptyBoard,
    #[error("Too many mines: requested {mines} but at most {capacity} fit around a safe first click")]
    TooManyMines { mines: CellCount, capacity: CellCount },
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates ({row}, {col}) are outside the board")]
    OutOfBounds { row: usize, col: usize },
    #[error("Invalid game configuration: {0}")]
    Config(#[from] ConfigError),
}

impl GameError {
    pub fn out_of_bounds((row, col): Coord2) -> Self {
        Self::OutOfBounds {
            row: row.into(),
            col: col.into(),
        }
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
