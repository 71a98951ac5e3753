use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;
use crate::types::count;

/// Square offsets `(dq, dr)`, row by row.
const SQUARE_OFFSETS: [(Coord, Coord); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Axial hex offsets `(dq, dr)`: E, NE, NW, W, SW, SE.
const HEX_OFFSETS: [(Coord, Coord); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

pub type Neighbors = SmallVec<[Coord2; 8]>;

/// Shape and adjacency rule of a grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    /// `0 <= q < width`, `0 <= r < height`, 8 neighbors.
    Square { width: u16, height: u16 },
    /// Hexagon of axial cells centred on `(0, 0)`, 6 neighbors.
    Hexagon { radius: u16 },
    /// Axial parallelogram `0 <= q < cols`, `0 <= r < rows`, 6 neighbors.
    HexRect { cols: u16, rows: u16 },
}

impl Topology {
    fn offsets(self) -> &'static [(Coord, Coord)] {
        match self {
            Self::Square { .. } => &SQUARE_OFFSETS,
            Self::Hexagon { .. } | Self::HexRect { .. } => &HEX_OFFSETS,
        }
    }

    /// Smallest corner and extent of the axial bounding box.
    fn bounds(self) -> (Coord2, [usize; 2]) {
        match self {
            Self::Square { width, height } => ((0, 0), [width.into(), height.into()]),
            Self::Hexagon { radius } => {
                let r = Coord::from(radius);
                let side = 2 * usize::from(radius) + 1;
                ((-r, -r), [side, side])
            }
            Self::HexRect { cols, rows } => ((0, 0), [cols.into(), rows.into()]),
        }
    }

    fn includes(self, (q, r): Coord2) -> bool {
        match self {
            Self::Hexagon { radius } => (q + r).abs() <= Coord::from(radius),
            // the bounding box already is the shape
            Self::Square { .. } | Self::HexRect { .. } => true,
        }
    }
}

/// Immutable set of cells plus the neighbor relation of a [`Topology`].
///
/// Cells are kept in canonical order, row `r` outer and column `q` inner, and
/// every board-side array is indexed by position in that order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Topology", into = "Topology")]
pub struct Grid {
    topology: Topology,
    origin: Coord2,
    slots: Array2<Option<u32>>,
    cells: Vec<Coord2>,
}

impl Grid {
    pub fn new(topology: Topology) -> Self {
        let (origin, [size_q, size_r]) = topology.bounds();
        let mut slots = Array2::from_elem([size_q, size_r], None);
        let mut cells = Vec::new();

        for dr in 0..size_r {
            for dq in 0..size_q {
                let coords = (origin.0 + dq as Coord, origin.1 + dr as Coord);
                if topology.includes(coords) {
                    slots[[dq, dr]] = Some(count(cells.len()));
                    cells.push(coords);
                }
            }
        }

        Self {
            topology,
            origin,
            slots,
            cells,
        }
    }

    pub fn square(width: u16, height: u16) -> Self {
        Self::new(Topology::Square { width, height })
    }

    pub fn hexagon(radius: u16) -> Self {
        Self::new(Topology::Hexagon { radius })
    }

    pub fn hex_rect(cols: u16, rows: u16) -> Self {
        Self::new(Topology::HexRect { cols, rows })
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn cells(&self) -> &[Coord2] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.index_of(coords).is_some()
    }

    pub fn index_of(&self, (q, r): Coord2) -> Option<usize> {
        let shifted = (q.checked_sub(self.origin.0)?, r.checked_sub(self.origin.1)?);
        let slot = self.slots.get(shifted.to_nd_index()?).copied().flatten();
        slot.map(|index| index as usize)
    }

    /// Panics if `index` is not below [`Grid::len`].
    pub fn coord_at(&self, index: usize) -> Coord2 {
        self.cells[index]
    }

    /// In-grid neighbors of `coords` in the topology's fixed order. Empty when
    /// `coords` itself is outside the grid.
    pub fn neighbors(&self, coords: Coord2) -> Neighbors {
        if !self.contains(coords) {
            return Neighbors::new();
        }
        let (q, r) = coords;
        self.topology
            .offsets()
            .iter()
            .map(|&(dq, dr)| (q + dq, r + dr))
            .filter(|&pos| self.contains(pos))
            .collect()
    }

    pub(crate) fn neighbor_indices(&self, index: usize) -> SmallVec<[usize; 8]> {
        let (q, r) = self.cells[index];
        self.topology
            .offsets()
            .iter()
            .filter_map(|&(dq, dr)| self.index_of((q + dq, r + dr)))
            .collect()
    }
}

impl From<Topology> for Grid {
    fn from(topology: Topology) -> Self {
        Self::new(topology)
    }
}

impl From<Grid> for Topology {
    fn from(grid: Grid) -> Self {
        grid.topology
    }
}
