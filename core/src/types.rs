/// Single coordinate axis. Axial hex coordinates can be negative.
pub type Coord = i32;

/// Count type used for mine counts and cell counts.
pub type CellCount = u32;

/// Two-dimensional coordinates `(q, r)`; for square grids `q` is the column and
/// `r` the row.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = Option<[usize; 2]>;

    /// Only meaningful for coordinates already shifted to a non-negative origin.
    fn to_nd_index(self) -> Self::Output {
        Some([self.0.try_into().ok()?, self.1.try_into().ok()?])
    }
}

pub(crate) fn count(n: usize) -> CellCount {
    n.try_into().unwrap_or(CellCount::MAX)
}
