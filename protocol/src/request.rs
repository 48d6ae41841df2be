use serde::{Deserialize, Serialize};
use sweeper_core::Difficulty;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Reveal,
    Flag,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameRequest {
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// A player move on one of the session's games.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickRequest {
    pub game_id: String,
    pub row: u32,
    pub col: u32,
    pub action: Action,
}

/// Replaces a game with a fresh board under the same id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetRequest {
    pub game_id: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}
