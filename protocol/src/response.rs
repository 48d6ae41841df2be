use serde::{Deserialize, Serialize};
use sweeper_core::{BoardView, CellCount, CellValue, Coord, Difficulty, GameState};

/// Cell as sent to clients; `value` is `null` while redacted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPayload {
    pub revealed: bool,
    pub flag: bool,
    pub value: Option<CellValue>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResponse {
    pub game_id: String,
    pub difficulty: Difficulty,
    pub rows: Coord,
    pub cols: Coord,
    pub board_state: Vec<Vec<CellPayload>>,
    pub mine_count: CellCount,
    pub remaining_mines: CellCount,
    /// A mine was revealed.
    pub game_over: bool,
    pub won: bool,
    pub state: GameState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_secs: Option<u64>,
}

impl GameResponse {
    pub fn from_view(
        game_id: String,
        difficulty: Difficulty,
        view: &BoardView,
        elapsed_secs: Option<u64>,
    ) -> Self {
        let board_state = view
            .cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| CellPayload {
                        revealed: cell.revealed,
                        flag: cell.flagged,
                        value: cell.value,
                    })
                    .collect()
            })
            .collect();

        Self {
            game_id,
            difficulty,
            rows: view.rows,
            cols: view.cols,
            board_state,
            mine_count: view.mine_count,
            remaining_mines: view.remaining_mines,
            game_over: view.state == GameState::Lost,
            won: view.state == GameState::Won,
            state: view.state,
            elapsed_secs,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: String,
    pub difficulty: Difficulty,
    pub state: GameState,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameList {
    pub games: Vec<GameSummary>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyInfo {
    pub name: Difficulty,
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl From<Difficulty> for DifficultyInfo {
    fn from(difficulty: Difficulty) -> Self {
        let (rows, cols, mines) = difficulty.dimensions();
        Self {
            name: difficulty,
            rows,
            cols,
            mines,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyList {
    pub difficulties: Vec<DifficultyInfo>,
}

impl DifficultyList {
    pub fn presets() -> Self {
        Self {
            difficulties: Difficulty::ALL.into_iter().map(DifficultyInfo::from).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadRequest,
    OutOfBounds,
    NotFound,
    MethodNotAllowed,
    TooManyGames,
    Internal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorKind,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
        }
    }
}
