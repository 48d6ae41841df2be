use sweeper_core::BoardView;
use sweeper_protocol::{
    Action, ClickRequest, DifficultyList, GameList, GameResponse, GameSummary, NewGameRequest,
    ResetRequest, StatusResponse,
};
use web_time::Instant;

use crate::*;

/// Game operations behind the HTTP routes, scoped to a session.
#[derive(Debug)]
pub struct GameService {
    config: ServerConfig,
    store: GameStore,
}

impl GameService {
    /// `seed` feeds every id and board generated by this service.
    pub fn new(config: ServerConfig, seed: u64) -> Self {
        let store = GameStore::new(&config, seed);
        Self { config, store }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Returns the caller's live session, or a new one and `true` when it has none.
    pub fn open_session(&self, existing: Option<SessionId>, now: Instant) -> (SessionId, bool) {
        match existing {
            Some(id) if self.store.contains_session(id, now) => (id, false),
            _ => (self.store.create_session(now), true),
        }
    }

    pub fn difficulties(&self) -> DifficultyList {
        DifficultyList::presets()
    }

    pub fn create_game(
        &self,
        session: SessionId,
        request: NewGameRequest,
        now: Instant,
    ) -> Result<GameResponse> {
        let game_id = self.store.insert_game(session, request.difficulty, now)?;
        self.get_game(session, &game_id.to_string(), now)
    }

    pub fn get_game(&self, session: SessionId, game_id: &str, now: Instant) -> Result<GameResponse> {
        let game_id: GameId = game_id.parse()?;
        self.store.with_session(session, now, |session| {
            let entry = session
                .game(game_id)
                .ok_or_else(|| ServiceError::GameNotFound(game_id.to_string()))?;
            Ok(self.respond(game_id, entry, now))
        })
    }

    /// Applies a move, or returns the frozen state when the game has already ended.
    pub fn click(&self, session: SessionId, request: ClickRequest, now: Instant) -> Result<GameResponse> {
        let game_id: GameId = request.game_id.parse()?;
        self.store.with_session(session, now, |session| {
            let entry = session
                .game_mut(game_id)
                .ok_or_else(|| ServiceError::GameNotFound(game_id.to_string()))?;

            if entry.board().is_finished() {
                log::debug!("Game {} already over, ignoring {:?}", game_id, request.action);
                return Ok(self.respond(game_id, entry, now));
            }

            let board = entry.board_mut();
            let coords = board.validate_coords(request.row as usize, request.col as usize)?;
            match request.action {
                Action::Reveal => {
                    let outcome = board.reveal(coords)?;
                    log::debug!("Game {} reveal {:?}: {:?}", game_id, coords, outcome);
                }
                Action::Flag => {
                    let outcome = board.toggle_flag(coords)?;
                    log::debug!("Game {} flag {:?}: {:?}", game_id, coords, outcome);
                }
            }
            entry.record_progress(now);
            if entry.board().is_finished() {
                log::info!("Game {} finished: {:?}", game_id, entry.board().state());
            }

            Ok(self.respond(game_id, entry, now))
        })
    }

    /// Starts over with a fresh board under the same game id.
    pub fn reset_game(&self, session: SessionId, request: ResetRequest, now: Instant) -> Result<GameResponse> {
        let game_id: GameId = request.game_id.parse()?;
        let seed = self.store.next_seed();
        self.store.with_session(session, now, |session| {
            let entry = session
                .game_mut(game_id)
                .ok_or_else(|| ServiceError::GameNotFound(game_id.to_string()))?;
            let difficulty = request.difficulty.unwrap_or(entry.difficulty());
            *entry = GameEntry::new(difficulty, seed)?;
            log::info!("Game {} reset to {}", game_id, difficulty);
            Ok(self.respond(game_id, entry, now))
        })
    }

    pub fn list_games(&self, session: SessionId, now: Instant) -> Result<GameList> {
        self.store.with_session(session, now, |session| {
            let games = session
                .games()
                .map(|(game_id, entry)| GameSummary {
                    game_id: game_id.to_string(),
                    difficulty: entry.difficulty(),
                    state: entry.board().state(),
                })
                .collect();
            Ok(GameList { games })
        })
    }

    pub fn delete_game(&self, session: SessionId, game_id: &str, now: Instant) -> Result<StatusResponse> {
        let game_id: GameId = game_id.parse()?;
        self.store.with_session(session, now, |session| {
            session
                .remove(game_id)
                .ok_or_else(|| ServiceError::GameNotFound(game_id.to_string()))?;
            log::info!("Game {} deleted", game_id);
            Ok(StatusResponse::ok())
        })
    }

    fn respond(&self, game_id: GameId, entry: &GameEntry, now: Instant) -> GameResponse {
        let view = BoardView::from_board(entry.board(), self.config.redaction());
        let elapsed_secs = entry.elapsed(now).map(|elapsed| elapsed.as_secs());
        GameResponse::from_view(game_id.to_string(), entry.difficulty(), &view, elapsed_secs)
    }
}
