use serde::{Deserialize, Serialize};

use crate::Position;

/// Player-visible state of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileStatus {
    Hidden,
    Marked,
    /// Revealed safe tile with the number of mines among its neighbours.
    Number(u8),
    /// Revealed mine, the losing tile.
    Mine,
}

impl TileStatus {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Marked)
    }

    pub const fn is_revealed(self) -> bool {
        !self.is_unrevealed()
    }
}

impl Default for TileStatus {
    fn default() -> Self {
        Self::Hidden
    }
}

/// One square of the board. Position and mine are fixed at construction, only the status changes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    position: Position,
    mine: bool,
    pub(crate) status: TileStatus,
}

impl Tile {
    pub(crate) const fn new(position: Position, mine: bool) -> Self {
        Self {
            position,
            mine,
            status: TileStatus::Hidden,
        }
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    pub const fn is_mine(&self) -> bool {
        self.mine
    }

    pub const fn status(&self) -> TileStatus {
        self.status
    }

    /// Only known once the tile was revealed as a number.
    pub const fn adjacent_mine_count(&self) -> Option<u8> {
        match self.status {
            TileStatus::Number(count) => Some(count),
            _ => None,
        }
    }
}
