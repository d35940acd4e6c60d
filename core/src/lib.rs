#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use tile::*;
pub use types::*;

mod board;
mod error;
mod generator;
pub mod ops;
mod session;
mod tile;
mod types;

/// Side length and mine count of a square board, validated on construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub size: Coord,
    pub mines: CellCount,
}

impl BoardConfig {
    pub const fn new_unchecked(size: Coord, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Coord, mines: CellCount) -> Result<Self> {
        Self::new_unchecked(size, mines).validated()
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked(9, 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked(16, 40)
    }

    /// Rejects an empty board or more mines than tiles.
    pub fn validated(self) -> Result<Self> {
        if self.size == 0 {
            return Err(ConfigIssue::EmptyBoard.into());
        }
        let capacity = self.total_tiles();
        if self.mines > capacity {
            return Err(ConfigIssue::TooManyMines {
                mines: self.mines,
                capacity,
            }
            .into());
        }
        Ok(self)
    }

    pub const fn total_tiles(&self) -> CellCount {
        area(self.size)
    }

    pub const fn safe_tiles(&self) -> CellCount {
        self.total_tiles().saturating_sub(self.mines)
    }

    /// Every position on the board, column by column.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let size = self.size;
        (0..size).flat_map(move |x| (0..size).map(move |y| Position::new(x, y)))
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new_unchecked(10, 10)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}
