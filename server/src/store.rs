use core::time::Duration;
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::Mutex;
use rand::prelude::*;
use sweeper_core::{Board, Difficulty};
use web_time::Instant;

use crate::*;

/// One board plus the bookkeeping the server keeps around it.
#[derive(Clone, Debug)]
pub struct GameEntry {
    board: Board,
    difficulty: Difficulty,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
}

impl GameEntry {
    pub fn new(difficulty: Difficulty, seed: u64) -> Result<Self> {
        Ok(Self {
            board: Board::new(difficulty.config(), seed)?,
            difficulty,
            started_at: None,
            ended_at: None,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Starts the clock on the first reveal and stops it when the game ends.
    pub fn record_progress(&mut self, now: Instant) {
        if self.started_at.is_none() && self.board.mines_placed() {
            self.started_at = Some(now);
        }
        if self.ended_at.is_none() && self.board.is_finished() {
            self.ended_at = Some(now);
        }
    }

    /// Play time so far, `None` before the first reveal.
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        let started_at = self.started_at?;
        let until = self.ended_at.unwrap_or(now);
        Some(until.saturating_duration_since(started_at))
    }
}

/// All games of one client.
#[derive(Debug, Default)]
pub struct Session {
    games: HashMap<GameId, GameEntry>,
    order: Vec<GameId>,
}

impl Session {
    pub fn game(&self, id: GameId) -> Option<&GameEntry> {
        self.games.get(&id)
    }

    pub fn game_mut(&mut self, id: GameId) -> Option<&mut GameEntry> {
        self.games.get_mut(&id)
    }

    /// Games in creation order.
    pub fn games(&self) -> impl Iterator<Item = (GameId, &GameEntry)> + '_ {
        self.order.iter().filter_map(|id| Some((*id, self.games.get(id)?)))
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    pub fn remove(&mut self, id: GameId) -> Option<GameEntry> {
        self.order.retain(|&other| other != id);
        self.games.remove(&id)
    }

    fn insert(&mut self, id: GameId, entry: GameEntry) {
        if self.games.insert(id, entry).is_none() {
            self.order.push(id);
        }
    }
}

#[derive(Debug)]
struct SessionSlot {
    last_seen: Instant,
    session: Arc<Mutex<Session>>,
}

/// In-memory map of sessions to their games.
///
/// The session index and each session have separate locks, so requests for different sessions never wait on each
/// other while requests for the same session are serialized.
#[derive(Debug)]
pub struct GameStore {
    sessions: Mutex<HashMap<SessionId, SessionSlot>>,
    rng: Mutex<SmallRng>,
    session_ttl: Duration,
    max_sessions: usize,
    max_games_per_session: usize,
}

impl GameStore {
    pub fn new(config: &ServerConfig, seed: u64) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
            session_ttl: config.session_ttl(),
            max_sessions: config.max_sessions.max(1),
            max_games_per_session: config.max_games_per_session,
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Seed for a new board.
    pub fn next_seed(&self) -> u64 {
        self.rng.lock().random()
    }

    pub fn create_session(&self, now: Instant) -> SessionId {
        let mut sessions = self.sessions.lock();

        if sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, slot)| slot.last_seen)
                .map(|(&id, _)| id);
            if let Some(oldest) = oldest {
                log::info!("Session limit reached, evicting least recently seen session {}", oldest);
                sessions.remove(&oldest);
            }
        }

        let id = loop {
            let id = SessionId::from_raw(self.rng.lock().random());
            if !sessions.contains_key(&id) {
                break id;
            }
        };
        sessions.insert(
            id,
            SessionSlot {
                last_seen: now,
                session: Default::default(),
            },
        );
        log::info!("Created session {}", id);
        id
    }

    /// Whether `id` names a live session; does not count as activity.
    pub fn contains_session(&self, id: SessionId, now: Instant) -> bool {
        self.sessions
            .lock()
            .get(&id)
            .is_some_and(|slot| !self.is_expired(slot, now))
    }

    /// Runs `f` with exclusive access to the session, refreshing its idle timer.
    pub fn with_session<R>(
        &self,
        id: SessionId,
        now: Instant,
        f: impl FnOnce(&mut Session) -> Result<R>,
    ) -> Result<R> {
        let session = {
            let mut sessions = self.sessions.lock();
            let Some(slot) = sessions.get_mut(&id) else {
                return Err(ServiceError::SessionNotFound);
            };
            if self.is_expired(slot, now) {
                log::info!("Session {} expired", id);
                sessions.remove(&id);
                return Err(ServiceError::SessionNotFound);
            }
            slot.last_seen = now;
            Arc::clone(&slot.session)
        };

        let mut session = session.lock();
        f(&mut session)
    }

    /// Adds a fresh game to the session, enforcing the per-session cap.
    pub fn insert_game(&self, id: SessionId, difficulty: Difficulty, now: Instant) -> Result<GameId> {
        let seed = self.next_seed();
        let max_games = self.max_games_per_session;
        let mut game_id = self.next_game_id();

        self.with_session(id, now, |session| {
            if session.game_count() >= max_games {
                return Err(ServiceError::TooManyGames(max_games));
            }
            while session.game(game_id).is_some() {
                game_id = self.next_game_id();
            }
            session.insert(game_id, GameEntry::new(difficulty, seed)?);
            log::info!("Session {} started {} game {}", id, difficulty, game_id);
            Ok(game_id)
        })
    }

    /// Drops every session idle for longer than the TTL, returning how many were removed.
    pub fn evict_expired(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, slot| !self.is_expired(slot, now));
        let evicted = before - sessions.len();
        if evicted > 0 {
            log::info!("Evicted {} expired sessions", evicted);
        }
        evicted
    }

    fn next_game_id(&self) -> GameId {
        GameId::from_raw(self.rng.lock().random())
    }

    fn is_expired(&self, slot: &SessionSlot, now: Instant) -> bool {
        now.saturating_duration_since(slot.last_seen) > self.session_ttl
    }
}
