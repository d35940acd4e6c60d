//! Board operations with value semantics.
//!
//! Every move takes the board by reference and hands back a new board, leaving the input untouched.
//! The tile states produced are the same as the in-place methods on [`Board`].

use alloc::collections::BTreeSet;

use rand::Rng;

use crate::*;

pub use crate::generate_mine_positions;

pub fn create_board<I>(board_size: Coord, mine_positions: I) -> Result<Board>
where
    I: IntoIterator<Item = Position>,
{
    Board::new(board_size, mine_positions)
}

/// Generates a random layout with `rng` and builds a hidden board from it.
pub fn create_random_board<R: Rng>(config: BoardConfig, rng: &mut R) -> Result<Board> {
    let positions: BTreeSet<Position> =
        generate_mine_positions(config.size, config.mines, rng)?;
    Board::new(config.size, positions)
}

pub fn reveal(board: &Board, position: Position) -> Result<Board> {
    let mut next = board.clone();
    next.reveal(position)?;
    Ok(next)
}

pub fn toggle_mark(board: &Board, position: Position) -> Result<Board> {
    let mut next = board.clone();
    next.toggle_mark(position)?;
    Ok(next)
}

pub fn count_marked(board: &Board) -> CellCount {
    board.count_marked()
}

pub fn is_won(board: &Board) -> bool {
    board.is_won()
}

pub fn is_lost(board: &Board) -> bool {
    board.is_lost()
}
