use core::fmt;

use serde::{Deserialize, Serialize};

/// Single coordinate axis used for the board side and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-tile counts.
pub type CellCount = u16;

/// Location of a tile on the board, `x` and `y` both in `0..size`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: Coord,
    pub y: Coord,
}

impl Position {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    pub const fn is_within(self, size: Coord) -> bool {
        self.x < size && self.y < size
    }

    /// Neighbours of this position on a `size`×`size` board, clipped to the edges.
    pub fn neighbors(self, size: Coord) -> NeighborIter {
        NeighborIter::new(self, size)
    }

    pub(crate) fn to_nd_index(self) -> [usize; 2] {
        [self.x.into(), self.y.into()]
    }
}

impl From<(Coord, Coord)> for Position {
    fn from((x, y): (Coord, Coord)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Number of tiles on a square board with the given side.
pub const fn area(size: Coord) -> CellCount {
    let size = size as CellCount;
    size.saturating_mul(size)
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `pos`, returning a value only when it remains in bounds.
fn apply_delta(pos: Position, (dx, dy): (i8, i8), size: Coord) -> Option<Position> {
    let x = pos.x.checked_add_signed(dx)?;
    if x >= size {
        return None;
    }

    let y = pos.y.checked_add_signed(dy)?;
    if y >= size {
        return None;
    }

    Some(Position { x, y })
}

#[derive(Debug, Clone)]
pub struct NeighborIter {
    center: Position,
    size: Coord,
    index: u8,
}

impl NeighborIter {
    fn new(center: Position, size: Coord) -> Self {
        Self {
            center,
            size,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta, self.size) {
                return Some(next_item);
            }
        }
    }
}
