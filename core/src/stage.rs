use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::Coord2;

/// Hand-made level layout, consumed once when a board is built.
///
/// Coordinates are in the grid's own system. Anything outside the grid is
/// ignored; blocked cells take precedence over mines, and mines over
/// `start_revealed`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stage {
    pub mines: Vec<Coord2>,
    pub blocked: Vec<Coord2>,
    pub start_revealed: Vec<Coord2>,
    pub start_flagged: Vec<Coord2>,
}

impl Stage {
    pub fn with_mines(mines: impl IntoIterator<Item = Coord2>) -> Self {
        Self {
            mines: mines.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn blocked(mut self, blocked: impl IntoIterator<Item = Coord2>) -> Self {
        self.blocked.extend(blocked);
        self
    }

    pub fn start_revealed(mut self, revealed: impl IntoIterator<Item = Coord2>) -> Self {
        self.start_revealed.extend(revealed);
        self
    }

    pub fn start_flagged(mut self, flagged: impl IntoIterator<Item = Coord2>) -> Self {
        self.start_flagged.extend(flagged);
        self
    }
}
