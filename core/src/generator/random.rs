use smallvec::SmallVec;

use super::*;
use crate::types::count;

/// Uniform placement over every cell except the starting area, driven by a
/// seeded generator so a layout can be replayed.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
    mines: CellCount,
    start: Coord2,
    start_tile: StartTile,
}

impl RandomMineGenerator {
    pub fn new(seed: u64, mines: CellCount, start: Coord2, start_tile: StartTile) -> Self {
        Self {
            seed,
            mines,
            start,
            start_tile,
        }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, grid: &Grid) -> Result<Vec<usize>> {
        use rand::prelude::*;
        use rand::rngs::StdRng;

        let mut excluded: SmallVec<[usize; 9]> = SmallVec::new();
        if let Some(start) = grid.index_of(self.start) {
            excluded.push(start);
            if matches!(self.start_tile, StartTile::AlwaysZero) {
                excluded.extend(grid.neighbor_indices(start));
            }
        }

        let mut candidates: Vec<usize> = (0..grid.len())
            .filter(|index| !excluded.contains(index))
            .collect();

        let wanted = self.mines as usize;
        if wanted > candidates.len() {
            return Err(BoardError::TooManyMines {
                requested: self.mines,
                available: count(candidates.len()),
            });
        }

        // partial Fisher-Yates, the first `wanted` slots end up uniformly sampled
        let mut rng = StdRng::seed_from_u64(self.seed);
        for slot in 0..wanted {
            let pick = rng.random_range(slot..candidates.len());
            candidates.swap(slot, pick);
        }
        candidates.truncate(wanted);
        candidates.sort_unstable();

        log::debug!(
            "Placed {} mines around start {:?} ({:?}, seed {})",
            wanted,
            self.start,
            self.start_tile,
            self.seed
        );
        Ok(candidates)
    }
}
