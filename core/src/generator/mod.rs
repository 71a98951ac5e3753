use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

pub trait MineGenerator {
    /// Picks the mine cells, as indices into [`Grid::cells`].
    fn generate(self, grid: &Grid) -> Result<Vec<usize>>;
}

/// How much room the first opened tile gets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartTile {
    /// The tile itself is never a mine.
    SimpleSafe,
    /// Neither the tile nor any of its neighbors is a mine, so it opens as a 0.
    #[default]
    AlwaysZero,
}
