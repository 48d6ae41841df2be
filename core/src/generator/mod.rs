use crate::*;
pub use random::*;

mod random;

/// Decides where the mines of a board go once the first cell to open is known.
pub trait MinefieldGenerator {
    /// The returned layout must keep the 3x3 block around `safe` free of mines.
    fn generate(self, config: GameConfig, safe: Coord2) -> MineLayout;
}
