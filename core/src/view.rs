use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// How much of the hidden board a view discloses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Redaction {
    /// Unrevealed values are withheld while the game is active; mines are disclosed once it ends.
    #[default]
    HideUnrevealed,
    /// Every value is included, even on an active board.
    ShowAll,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub revealed: bool,
    pub flagged: bool,
    pub value: Option<CellValue>,
}

/// Serializable snapshot of a board, rows first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub rows: Coord,
    pub cols: Coord,
    pub cells: Vec<Vec<CellView>>,
    pub mine_count: CellCount,
    pub remaining_mines: CellCount,
    pub mines_placed: bool,
    pub state: GameState,
}

impl BoardView {
    pub fn from_board(board: &Board, redaction: Redaction) -> Self {
        let (rows, cols) = board.size();
        let finished = board.is_finished();

        let mut cells: Vec<Vec<CellView>> = (0..rows).map(|_| Vec::with_capacity(cols.into())).collect();
        for ((row, _), cell) in board.iter_cells() {
            let disclosed = match redaction {
                Redaction::ShowAll => true,
                Redaction::HideUnrevealed => cell.revealed || (finished && cell.value.is_mine()),
            };
            cells[usize::from(row)].push(CellView {
                revealed: cell.revealed,
                flagged: cell.flagged,
                value: disclosed.then_some(cell.value),
            });
        }

        Self {
            rows,
            cols,
            cells,
            mine_count: board.mine_count(),
            remaining_mines: board.remaining_mines(),
            mines_placed: board.mines_placed(),
            state: board.state(),
        }
    }

    pub fn cell(&self, (row, col): Coord2) -> Option<&CellView> {
        self.cells.get(usize::from(row))?.get(usize::from(col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::with_layout(MineLayout::from_mine_coords((3, 3), &[(0, 0), (2, 2)]).unwrap())
    }

    #[test]
    fn hidden_values_are_withheld_while_active() {
        let mut board = board();
        board.reveal((1, 1)).unwrap();
        board.toggle_flag((0, 0)).unwrap();

        let view = BoardView::from_board(&board, Redaction::HideUnrevealed);

        assert_eq!(view.state, GameState::Active);
        assert_eq!(view.remaining_mines, 1);
        assert_eq!(view.cell((1, 1)).unwrap().value, Some(CellValue::Count(2)));
        assert_eq!(
            *view.cell((0, 0)).unwrap(),
            CellView {
                revealed: false,
                flagged: true,
                value: None
            }
        );
        for (row, cells) in view.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                assert_eq!(cell.value.is_some(), cell.revealed, "({row}, {col})");
            }
        }
    }

    #[test]
    fn mines_are_disclosed_after_loss() {
        let mut board = board();
        board.reveal((0, 0)).unwrap();

        let view = BoardView::from_board(&board, Redaction::HideUnrevealed);

        assert_eq!(view.state, GameState::Lost);
        assert_eq!(view.cell((2, 2)).unwrap().value, Some(CellValue::Mine));
        assert!(!view.cell((2, 2)).unwrap().revealed);
        assert_eq!(view.cell((1, 1)).unwrap().value, None);
    }

    #[test]
    fn show_all_includes_every_value() {
        let board = board();

        let view = BoardView::from_board(&board, Redaction::ShowAll);

        assert_eq!(view.cells.len(), 3);
        assert!(view.cells.iter().all(|row| row.len() == 3));
        assert_eq!(view.cell((0, 0)).unwrap().value, Some(CellValue::Mine));
        assert_eq!(view.cell((0, 1)).unwrap().value, Some(CellValue::Count(1)));
        assert!(view.cell((3, 0)).is_none());
    }

    #[test]
    fn view_serializes_to_plain_json() {
        let mut board = board();
        board.reveal((0, 2)).unwrap();

        let view = BoardView::from_board(&board, Redaction::HideUnrevealed);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["state"], "Active");
        assert_eq!(json["cells"][0][2]["value"], 0);
        assert_eq!(json["cells"][0][0]["value"], serde_json::Value::Null);
        let back: BoardView = serde_json::from_value(json).unwrap();
        assert_eq!(back, view);
    }
}
