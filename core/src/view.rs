use serde::{Deserialize, Serialize};

use crate::*;

/// What the player gets to see of a tile, including the end-of-game reveal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    Blocked,
    /// Mine uncovered by a lost game.
    Mine,
    /// The mine that was opened.
    Exploded,
    /// Flag on a safe tile, shown once the game is lost.
    WrongFlag,
}

impl CellView {
    /// Whether the tile is drawn closed
    pub const fn is_closed(self) -> bool {
        use CellView::*;
        match self {
            Hidden => true,
            Flagged => true,
            WrongFlag => true,
            Revealed(_) => false,
            Blocked => false,
            Mine => false,
            Exploded => false,
        }
    }

    fn of(tile: &Tile, phase: Phase) -> Self {
        let lost = phase.is_lost();
        match tile.state() {
            TileState::Blocked => Self::Blocked,
            TileState::Revealed if tile.is_mine() => Self::Exploded,
            TileState::Revealed => Self::Revealed(tile.number().max(0) as u8),
            TileState::Flagged if lost && !tile.is_mine() => Self::WrongFlag,
            TileState::Flagged => Self::Flagged,
            TileState::Covered if tile.is_tripped() => Self::Exploded,
            TileState::Covered if lost && tile.is_mine() => Self::Mine,
            TileState::Covered => Self::Hidden,
        }
    }
}

impl Board {
    pub fn view(&self, coords: Coord2) -> Option<CellView> {
        self.tile(coords).map(|tile| CellView::of(tile, self.phase()))
    }

    /// Every cell in grid order.
    pub fn views(&self) -> impl Iterator<Item = (Coord2, CellView)> + '_ {
        let phase = self.phase();
        self.tiles()
            .map(move |(coords, tile)| (coords, CellView::of(tile, phase)))
    }
}
