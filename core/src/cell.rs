use core::fmt;

use serde::{Deserialize, Serialize};

/// Integer encoding of a mine in serialized boards.
pub const MINE: i8 = -1;

/// What a cell holds: a mine or the number of mines among its neighbors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum CellValue {
    Mine,
    Count(u8),
}

impl CellValue {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn is_zero(self) -> bool {
        matches!(self, Self::Count(0))
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Count(0)
    }
}

impl From<CellValue> for i8 {
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::Mine => MINE,
            // at most 8 neighbors
            CellValue::Count(count) => count as i8,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InvalidCellValue(pub i8);

impl fmt::Display for InvalidCellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid cell value {}, expected -1 or 0..=8", self.0)
    }
}

impl TryFrom<i8> for CellValue {
    type Error = InvalidCellValue;

    fn try_from(value: i8) -> core::result::Result<Self, Self::Error> {
        match value {
            MINE => Ok(Self::Mine),
            0..=8 => Ok(Self::Count(value as u8)),
            _ => Err(InvalidCellValue(value)),
        }
    }
}

/// One grid position of a board.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub revealed: bool,
    pub flagged: bool,
    pub value: CellValue,
}

impl Cell {
    /// Whether a reveal may open this cell.
    pub const fn is_revealable(&self) -> bool {
        !self.revealed && !self.flagged
    }
}
