use ndarray::Array2;

use super::*;

/// Rejection-sampling generator: draws uniformly over the whole board and discards draws that land on the
/// forbidden neighborhood of the first click or on an already chosen cell.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig, safe: Coord2) -> MineLayout {
        use rand::prelude::*;

        let size = config.size();
        let mut forbidden: Array2<bool> = Array2::default(size.to_nd_index());
        for coords in neighborhood(safe, size) {
            forbidden[coords.to_nd_index()] = true;
        }

        // `Board::new` only accepts configs with this many free cells, which keeps the loop finite
        let free_cells = config.total_cells() - forbidden.iter().filter(|&&cell| cell).count() as CellCount;
        debug_assert!(
            config.mines() <= free_cells,
            "{} mines do not fit outside the neighborhood of {:?}",
            config.mines(),
            safe
        );
        let wanted = config.mines().min(free_cells);

        let mut mines: Array2<bool> = Array2::default(size.to_nd_index());
        let mut placed: CellCount = 0;
        let mut draws: u32 = 0;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        while placed < wanted {
            let coords: Coord2 = (rng.random_range(0..size.0), rng.random_range(0..size.1));
            draws += 1;
            let index = coords.to_nd_index();
            if forbidden[index] || mines[index] {
                continue;
            }
            mines[index] = true;
            placed += 1;
        }

        log::debug!(
            "Placed {} mines around safe cell {:?} in {} draws",
            placed,
            safe,
            draws
        );
        MineLayout::from_mine_mask(mines)
    }
}
