#![no_std]

extern crate alloc;

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use stage::*;
pub use tile::*;
pub use types::*;
pub use view::*;

mod engine;
mod error;
mod generator;
mod grid;
mod stage;
mod tile;
mod types;
mod view;

/// What happens when the player opens a tile that holds a mine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MineRevealPolicy {
    /// The mine is revealed and the game is lost on the spot.
    #[default]
    ImmediateLoss,
    /// The mine is exposed and costs one mistake; the game goes on and is
    /// only won once every mine is flagged.
    AccumulateMistakes,
}

/// Where the mines come from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlacementPolicy {
    /// Exact layout handed in by a level.
    Stage(Stage),
    /// Random layout sampled on the first reveal, keeping the clicked cell
    /// (and, for [`StartTile::AlwaysZero`], its neighbors) clear.
    FirstClickSafe {
        mines: CellCount,
        seed: u64,
        start_tile: StartTile,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub mine_reveal: MineRevealPolicy,
    pub placement: PlacementPolicy,
    pub flag_mistakes: bool,
}

impl BoardConfig {
    pub fn staged(stage: Stage) -> Self {
        Self {
            mine_reveal: MineRevealPolicy::default(),
            placement: PlacementPolicy::Stage(stage),
            flag_mistakes: false,
        }
    }

    pub fn first_click_safe(mines: CellCount, seed: u64) -> Self {
        Self {
            mine_reveal: MineRevealPolicy::default(),
            placement: PlacementPolicy::FirstClickSafe {
                mines,
                seed,
                start_tile: StartTile::default(),
            },
            flag_mistakes: false,
        }
    }

    pub fn with_mine_reveal(mut self, mine_reveal: MineRevealPolicy) -> Self {
        self.mine_reveal = mine_reveal;
        self
    }

    pub fn with_flag_mistakes(mut self, flag_mistakes: bool) -> Self {
        self.flag_mistakes = flag_mistakes;
        self
    }

    /// Only affects [`PlacementPolicy::FirstClickSafe`].
    pub fn with_start_tile(mut self, start: StartTile) -> Self {
        if let PlacementPolicy::FirstClickSafe { start_tile, .. } = &mut self.placement {
            *start_tile = start;
        }
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Used to merge outcomes when a chord opens several tiles
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
