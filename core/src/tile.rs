use serde::{Deserialize, Serialize};

/// Visibility of a single tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileState {
    #[default]
    Covered,
    Revealed,
    Flagged,
    /// Inert cell: no mine, never revealable, left out of every counter.
    Blocked,
}

impl TileState {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Covered | Self::Flagged)
    }
}

/// Simulation state of one grid cell. Only [`crate::Board`] mutates tiles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub(crate) is_mine: bool,
    pub(crate) tripped: bool,
    pub(crate) number: i8,
    pub(crate) state: TileState,
}

impl Tile {
    /// Sentinel stored in [`Tile::number`] for mines.
    pub const MINE: i8 = -1;

    pub const fn is_mine(&self) -> bool {
        self.is_mine
    }

    pub const fn is_blocked(&self) -> bool {
        matches!(self.state, TileState::Blocked)
    }

    /// Mine neighbors, [`Tile::MINE`] for a mine, 0 for a blocked tile.
    pub const fn number(&self) -> i8 {
        self.number
    }

    pub const fn state(&self) -> TileState {
        self.state
    }

    /// A mine that was opened without ending the game. It stays covered so it
    /// can still be flagged.
    pub const fn is_tripped(&self) -> bool {
        self.tripped
    }

    pub(crate) const fn is_safe_cell(&self) -> bool {
        !self.is_mine && !self.is_blocked()
    }
}
