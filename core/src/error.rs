use thiserror::Error;

use crate::{CellCount, Coord, Position};

/// Why a board configuration was rejected.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("board size must be at least 1")]
    EmptyBoard,
    #[error("{mines} mines do not fit on a board with {capacity} tiles")]
    TooManyMines { mines: CellCount, capacity: CellCount },
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigIssue),
    #[error("Position {position} is outside of a {size}x{size} board")]
    OutOfBounds { position: Position, size: Coord },
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Tile at {0} contradicts the board it belongs to")]
    InvalidTile(Position),
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
