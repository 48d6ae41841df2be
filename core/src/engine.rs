use alloc::collections::VecDeque;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Active,
    Lost,
    Won,
}

impl GameState {
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// The grid and all mutable state of one match.
///
/// Mines are placed lazily by the first [`Board::reveal`], keeping the clicked cell and its neighbors mine-free.
/// A board assumes a single writer; callers sharing one across threads must serialize access themselves.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    config: GameConfig,
    seed: u64,
    cells: Array2<Cell>,
    mine_layout: Option<MineLayout>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

impl Board {
    /// Creates an empty board; `seed` drives the mine placement on the first reveal.
    ///
    /// Fails when `config` is empty or holds more mines than fit around a safe first click.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        let config = GameConfig::new(config.rows(), config.cols(), config.mines())?;
        Ok(Self::empty(config, seed))
    }

    /// Creates a board whose mines are already placed, skipping first-click protection.
    pub fn with_layout(mine_layout: MineLayout) -> Self {
        let (rows, cols) = mine_layout.size();
        let config = GameConfig::new_unchecked(rows, cols, mine_layout.mine_count());
        let mut board = Self::empty(config, 0);
        board.apply_layout(mine_layout);
        board
    }

    fn empty(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            cells: Array2::default(config.size().to_nd_index()),
            mine_layout: None,
            revealed_count: 0,
            flagged_count: 0,
            state: GameState::Active,
            triggered_mine: None,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines()
    }

    pub fn remaining_mines(&self) -> CellCount {
        self.config.mines() - self.flagged_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn mines_placed(&self) -> bool {
        self.mine_layout.is_some()
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.check_coords(coords)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    /// All cells in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    /// Mine coordinates, empty until the mines are placed.
    pub fn mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_layout.iter().flat_map(|layout| layout.iter_mines())
    }

    /// Converts wide coordinates, such as ones read off the wire, into board coordinates.
    pub fn validate_coords(&self, row: usize, col: usize) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if row < usize::from(rows) && col < usize::from(cols) {
            Ok((row as Coord, col as Coord))
        } else {
            Err(GameError::OutOfBounds { row, col })
        }
    }

    /// Whether every cell without a mine has been revealed, regardless of flags.
    pub fn is_cleared(&self) -> bool {
        self.mine_layout
            .as_ref()
            .is_some_and(|layout| self.revealed_count == layout.safe_cell_count())
    }

    /// Places the mines keeping the 3x3 block around `safe` clear. Does nothing once mines exist.
    pub(crate) fn place_mines(&mut self, safe: Coord2) -> Result<()> {
        let generator = RandomMinefieldGenerator::new(self.seed);
        self.place_mines_with(generator, safe)
    }

    pub(crate) fn place_mines_with(&mut self, generator: impl MinefieldGenerator, safe: Coord2) -> Result<()> {
        let safe = self.check_coords(safe)?;
        if self.mines_placed() {
            log::debug!("Mines already placed, ignoring placement around {:?}", safe);
            return Ok(());
        }

        let layout = generator.generate(self.config, safe);
        self.apply_layout(layout);
        Ok(())
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.check_coords(coords)?;

        if self.state.is_finished() || !self.cells[coords.to_nd_index()].is_revealable() {
            return Ok(RevealOutcome::NoChange);
        }

        if !self.mines_placed() {
            self.place_mines(coords)?;
        }

        Ok(self.reveal_cell(coords))
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use MarkOutcome::*;

        let coords = self.check_coords(coords)?;
        if self.state.is_finished() {
            return Ok(NoChange);
        }

        let remaining = self.remaining_mines();
        let cell = &mut self.cells[coords.to_nd_index()];
        Ok(if cell.revealed {
            NoChange
        } else if cell.flagged {
            cell.flagged = false;
            self.flagged_count -= 1;
            Changed
        } else if remaining == 0 {
            log::debug!("No flags left, not flagging {:?}", coords);
            NoChange
        } else {
            cell.flagged = true;
            self.flagged_count += 1;
            Changed
        })
    }

    fn reveal_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = &mut self.cells[coords.to_nd_index()];
        cell.revealed = true;
        let value = cell.value;
        log::debug!("Reveal cell at {:?}, value: {:?}", coords, value);

        if value.is_mine() {
            self.triggered_mine = Some(coords);
            self.state = GameState::Lost;
            log::debug!("Mine hit at {:?}, game lost", coords);
            return RevealOutcome::HitMine;
        }

        self.revealed_count += 1;
        if value.is_zero() {
            self.flood_fill(coords);
        }

        if self.is_cleared() {
            self.state = GameState::Won;
            log::debug!("Board cleared, game won");
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    /// Reveals the zero region connected to `origin` and the numbered cells bordering it.
    fn flood_fill(&mut self, origin: Coord2) {
        let mut to_visit: VecDeque<_> = self.revealable_neighbors(origin).collect();
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            origin,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop_front() {
            let cell = &mut self.cells[visit_coords.to_nd_index()];
            // queued more than once, or flagged
            if !cell.is_revealable() {
                continue;
            }

            cell.revealed = true;
            let value = cell.value;
            self.revealed_count += 1;
            log::trace!("Flood revealed cell at {:?}, value: {:?}", visit_coords, value);

            if value.is_zero() {
                to_visit.extend(self.revealable_neighbors(visit_coords));
            }
        }
    }

    fn apply_layout(&mut self, mine_layout: MineLayout) {
        for ((row, col), cell) in self.cells.indexed_iter_mut() {
            let coords = (row as Coord, col as Coord);
            cell.value = if mine_layout.contains_mine(coords) {
                CellValue::Mine
            } else {
                CellValue::Count(mine_layout.adjacent_mine_count(coords))
            };
        }
        self.mine_layout = Some(mine_layout);
    }

    fn revealable_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        NeighborIter::new(coords, self.size())
            .filter(move |&pos| self.cells[pos.to_nd_index()].is_revealable())
    }

    fn check_coords(&self, coords: Coord2) -> Result<Coord2> {
        self.validate_coords(coords.0.into(), coords.1.into())
    }
}
