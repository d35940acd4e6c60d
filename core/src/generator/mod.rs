use alloc::collections::BTreeSet;

use rand::Rng;

use crate::*;
pub use random::*;

mod random;

pub trait MineGenerator {
    fn generate(self, config: BoardConfig) -> BTreeSet<Position>;
}

/// Picks `mine_count` distinct positions on a `board_size`×`board_size` board, uniformly at random.
pub fn generate_mine_positions<R: Rng>(
    board_size: Coord,
    mine_count: CellCount,
    rng: &mut R,
) -> Result<BTreeSet<Position>> {
    let config = BoardConfig::new(board_size, mine_count)?;
    Ok(place_mines(config, rng))
}

/// Rejection sampling: draw positions until enough distinct ones were collected.
///
/// Terminates because a validated config never asks for more mines than tiles.
pub(crate) fn place_mines<R: Rng>(config: BoardConfig, rng: &mut R) -> BTreeSet<Position> {
    // sampling the last free tiles of a full board would mostly hit duplicates
    if config.mines == config.total_tiles() {
        if config.mines > 0 {
            log::warn!("Board is full of mines, no safe tile is left to reveal");
        }
        return config.positions().collect();
    }

    let wanted = usize::from(config.mines);
    let mut positions = BTreeSet::new();
    while positions.len() < wanted {
        let pos = Position::new(
            rng.random_range(0..config.size),
            rng.random_range(0..config.size),
        );
        if !positions.insert(pos) {
            log::trace!("Rejected duplicate mine position {}", pos);
        }
    }

    log::debug!(
        "Placed {} mines on a {}x{} board",
        positions.len(),
        config.size,
        config.size
    );
    positions
}
