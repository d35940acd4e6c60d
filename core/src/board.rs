use alloc::vec;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Square grid of tiles with a fixed mine layout.
///
/// All moves mutate the board in place, see [`crate::ops`] for the value-returning flavour.
/// Nothing here stops moves after the game is decided, [`GameSession`] does that.
///
/// Deserializing checks the tiles against the declared size and rebuilds the counters from them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    tiles: Array2<Tile>,
    size: Coord,
    mine_count: CellCount,
    revealed_count: CellCount,
    marked_count: CellCount,
    exploded_count: CellCount,
    triggered_mine: Option<Position>,
}

impl Board {
    /// Builds a hidden board with mines at the given positions, duplicates count once.
    pub fn new<I>(size: Coord, mine_positions: I) -> Result<Self>
    where
        I: IntoIterator<Item = Position>,
    {
        BoardConfig::new(size, 0)?;

        let mut mine_mask: Array2<bool> = Array2::default([usize::from(size); 2]);
        for pos in mine_positions {
            if !pos.is_within(size) {
                return Err(GameError::OutOfBounds {
                    position: pos,
                    size,
                });
            }
            mine_mask[pos.to_nd_index()] = true;
        }

        let tiles = Array2::from_shape_fn(mine_mask.raw_dim(), |(x, y)| {
            let position = Position::new(x as Coord, y as Coord);
            Tile::new(position, mine_mask[[x, y]])
        });
        // at most 255 * 255 tiles, fits in CellCount
        let mine_count = mine_mask.iter().filter(|&&mine| mine).count() as CellCount;

        log::debug!("Created {}x{} board with {} mines", size, size, mine_count);
        Ok(Self {
            tiles,
            size,
            mine_count,
            revealed_count: 0,
            marked_count: 0,
            exploded_count: 0,
            triggered_mine: None,
        })
    }

    /// Generates a layout for `config` and builds the board from it.
    pub fn generate(config: BoardConfig, generator: impl MineGenerator) -> Result<Self> {
        let config = config.validated()?;
        Self::new(config.size, generator.generate(config))
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn config(&self) -> BoardConfig {
        BoardConfig::new_unchecked(self.size, self.mine_count)
    }

    pub fn validate_position(&self, position: Position) -> Result<Position> {
        if position.is_within(self.size) {
            Ok(position)
        } else {
            Err(GameError::OutOfBounds {
                position,
                size: self.size,
            })
        }
    }

    pub fn tile(&self, position: Position) -> Result<&Tile> {
        let position = self.validate_position(position)?;
        Ok(&self.tiles[position.to_nd_index()])
    }

    pub fn status_at(&self, position: Position) -> Result<TileStatus> {
        self.tile(position).map(Tile::status)
    }

    /// All tiles, column by column.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Rows of tiles with a fixed `y`, in the order a renderer lays them out.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = &Tile>> {
        self.tiles.columns().into_iter().map(|row| row.into_iter())
    }

    pub fn count_marked(&self) -> CellCount {
        self.marked_count
    }

    pub fn count_revealed(&self) -> CellCount {
        self.revealed_count
    }

    /// Mine count minus marks, negative when the player placed too many marks.
    pub fn mines_left(&self) -> isize {
        (self.mine_count as isize) - (self.marked_count as isize)
    }

    /// First mine that was revealed, if any.
    pub fn triggered_mine(&self) -> Option<Position> {
        self.triggered_mine
    }

    /// No mine was revealed and every safe tile shows its number.
    pub fn is_won(&self) -> bool {
        self.exploded_count == 0 && self.revealed_count == self.config().safe_tiles()
    }

    /// At least one mine was revealed.
    pub fn is_lost(&self) -> bool {
        self.exploded_count > 0
    }

    pub fn toggle_mark(&mut self, position: Position) -> Result<MarkOutcome> {
        use MarkOutcome::*;
        use TileStatus::*;

        let position = self.validate_position(position)?;
        let tile = &mut self.tiles[position.to_nd_index()];

        Ok(match tile.status {
            Hidden => {
                tile.status = Marked;
                self.marked_count += 1;
                Changed
            }
            Marked => {
                tile.status = Hidden;
                self.marked_count -= 1;
                Changed
            }
            Number(_) | Mine => NoChange,
        })
    }

    pub fn reveal(&mut self, position: Position) -> Result<RevealOutcome> {
        let position = self.validate_position(position)?;
        let tile = self.tiles[position.to_nd_index()];

        if tile.status != TileStatus::Hidden {
            return Ok(RevealOutcome::NoChange);
        }

        if tile.is_mine() {
            self.explode(position);
            return Ok(RevealOutcome::HitMine);
        }

        self.flood_reveal(position);

        if self.is_won() {
            log::debug!("All safe tiles revealed");
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    /// Unmarks every marked tile and reveals every mine.
    pub(crate) fn expose_mines(&mut self) {
        for x in 0..self.size {
            for y in 0..self.size {
                let position = Position::new(x, y);
                let tile = self.tiles[position.to_nd_index()];
                if tile.status == TileStatus::Marked {
                    self.tiles[position.to_nd_index()].status = TileStatus::Hidden;
                    self.marked_count -= 1;
                }
                if tile.is_mine() && tile.status.is_unrevealed() {
                    self.explode(position);
                }
            }
        }
    }

    fn explode(&mut self, position: Position) {
        log::debug!("Revealed mine at {}", position);
        self.tiles[position.to_nd_index()].status = TileStatus::Mine;
        self.exploded_count += 1;
        self.triggered_mine.get_or_insert(position);
    }

    /// Reveals a safe tile and, through zero tiles, everything connected to it.
    fn flood_reveal(&mut self, start: Position) {
        let mut to_visit = vec![start];

        while let Some(position) = to_visit.pop() {
            let tile = self.tiles[position.to_nd_index()];
            // visited through another zero tile already, or marked by the player
            if tile.status != TileStatus::Hidden || tile.is_mine() {
                continue;
            }

            let count = self.adjacent_mine_count(position);
            self.tiles[position.to_nd_index()].status = TileStatus::Number(count);
            self.revealed_count += 1;
            log::trace!("Revealed tile at {}, mine count: {}", position, count);

            if count == 0 {
                to_visit.extend(self.hidden_neighbors(position));
            }
        }
    }

    fn adjacent_mine_count(&self, position: Position) -> u8 {
        // at most eight neighbours
        position
            .neighbors(self.size)
            .filter(|pos| self.tiles[pos.to_nd_index()].is_mine())
            .count() as u8
    }

    fn hidden_neighbors(&self, position: Position) -> Vec<Position> {
        position
            .neighbors(self.size)
            .filter(|pos| self.tiles[pos.to_nd_index()].status == TileStatus::Hidden)
            .collect()
    }
}

/// Stored form of a board, counters are derived again on load.
#[derive(Deserialize)]
struct RawBoard {
    tiles: Array2<Tile>,
    size: Coord,
    triggered_mine: Option<Position>,
}

impl TryFrom<RawBoard> for Board {
    type Error = GameError;

    fn try_from(raw: RawBoard) -> Result<Self> {
        let RawBoard {
            tiles,
            size,
            triggered_mine,
        } = raw;

        BoardConfig::new(size, 0)?;
        if tiles.dim() != (usize::from(size), usize::from(size)) {
            return Err(GameError::InvalidBoardShape);
        }

        let mut board = Self {
            tiles,
            size,
            mine_count: 0,
            revealed_count: 0,
            marked_count: 0,
            exploded_count: 0,
            triggered_mine: None,
        };

        let (mut mines, mut revealed, mut marked, mut exploded) = (0, 0, 0, 0);
        for ((x, y), tile) in board.tiles.indexed_iter() {
            let position = Position::new(x as Coord, y as Coord);
            let consistent = tile.position() == position
                && match tile.status() {
                    TileStatus::Hidden | TileStatus::Marked => true,
                    TileStatus::Number(count) => {
                        !tile.is_mine() && count == board.adjacent_mine_count(position)
                    }
                    TileStatus::Mine => tile.is_mine(),
                };
            if !consistent {
                return Err(GameError::InvalidTile(position));
            }

            mines += CellCount::from(tile.is_mine());
            match tile.status() {
                TileStatus::Hidden => {}
                TileStatus::Marked => marked += 1,
                TileStatus::Number(_) => revealed += 1,
                TileStatus::Mine => exploded += 1,
            }
        }

        let first_mine = board
            .tiles()
            .find(|tile| tile.status() == TileStatus::Mine)
            .map(Tile::position);
        board.triggered_mine = match triggered_mine {
            None => first_mine,
            Some(pos) if board.status_at(pos) == Ok(TileStatus::Mine) => Some(pos),
            Some(pos) => return Err(GameError::InvalidTile(pos)),
        };

        board.mine_count = mines;
        board.revealed_count = revealed;
        board.marked_count = marked;
        board.exploded_count = exploded;
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn board(size: Coord, mines: &[(Coord, Coord)]) -> Board {
        Board::new(size, mines.iter().copied().map(Position::from)).unwrap()
    }

    fn status(board: &Board, x: Coord, y: Coord) -> TileStatus {
        board.status_at(Position::new(x, y)).unwrap()
    }

    fn scan_won(board: &Board) -> bool {
        board.tiles().all(|tile| match tile.status() {
            TileStatus::Number(_) => true,
            TileStatus::Hidden | TileStatus::Marked => tile.is_mine(),
            TileStatus::Mine => false,
        })
    }

    fn scan_lost(board: &Board) -> bool {
        board.tiles().any(|tile| tile.status() == TileStatus::Mine)
    }

    #[test]
    fn new_board_is_hidden_with_fixed_mines() {
        let board = board(3, &[(0, 0), (2, 1)]);

        assert_eq!(board.tiles().count(), 9);
        assert_eq!(board.tiles().filter(|tile| tile.is_mine()).count(), 2);
        assert_eq!(board.mine_count(), 2);
        assert!(board.tiles().all(|tile| tile.status() == TileStatus::Hidden));
        assert!(board.tile(Position::new(2, 1)).unwrap().is_mine());
    }

    #[test]
    fn tiles_know_their_position() {
        let board = board(4, &[]);

        assert!(
            board
                .tiles()
                .all(|tile| board.tile(tile.position()).unwrap() == tile)
        );
    }

    #[test]
    fn duplicate_mine_positions_count_once() {
        let board = board(3, &[(1, 1), (1, 1)]);

        assert_eq!(board.mine_count(), 1);
    }

    #[test]
    fn new_rejects_out_of_bounds_mines_and_empty_size() {
        assert_eq!(
            Board::new(3, [Position::new(3, 0)]),
            Err(GameError::OutOfBounds {
                position: Position::new(3, 0),
                size: 3
            })
        );
        assert_eq!(
            Board::new(0, []),
            Err(GameError::InvalidConfiguration(ConfigIssue::EmptyBoard))
        );
    }

    #[test]
    fn cascade_reveals_everything_but_the_corner_mine() {
        let mut board = board(3, &[(0, 0)]);

        let outcome = board.reveal(Position::new(2, 2)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(status(&board, 0, 0), TileStatus::Hidden);
        assert_eq!(status(&board, 1, 0), TileStatus::Number(1));
        assert_eq!(status(&board, 0, 1), TileStatus::Number(1));
        assert_eq!(status(&board, 1, 1), TileStatus::Number(1));
        for (x, y) in [(2, 0), (2, 1), (0, 2), (1, 2), (2, 2)] {
            assert_eq!(status(&board, x, y), TileStatus::Number(0));
        }
        assert!(board.is_won());
        assert!(!board.is_lost());
        assert_eq!(board.is_won(), scan_won(&board));
    }

    #[test]
    fn revealing_a_mine_loses_without_cascade() {
        let mut board = board(3, &[(0, 0)]);

        let outcome = board.reveal(Position::new(0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(status(&board, 0, 0), TileStatus::Mine);
        assert_eq!(board.count_revealed(), 0);
        assert_eq!(board.triggered_mine(), Some(Position::new(0, 0)));
        assert!(board.is_lost());
        assert!(!board.is_won());
        assert_eq!(board.is_lost(), scan_lost(&board));
    }

    #[test]
    fn numbered_tile_stops_cascade() {
        let mut board = board(3, &[(0, 0)]);

        let outcome = board.reveal(Position::new(1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert_eq!(status(&board, 1, 1), TileStatus::Number(1));
        assert_eq!(board.count_revealed(), 1);
        assert!(!board.is_won());
    }

    #[test]
    fn cascade_skips_marked_tiles() {
        let mut board = board(4, &[(0, 0)]);
        board.toggle_mark(Position::new(3, 2)).unwrap();

        board.reveal(Position::new(3, 3)).unwrap();

        assert_eq!(status(&board, 3, 2), TileStatus::Marked);
        assert!(!board.is_won());
        assert_eq!(board.is_won(), scan_won(&board));
    }

    #[test]
    fn cascade_stops_at_number_walls() {
        // the mine column at x = 2 splits the board
        let mut board = board(5, &[(2, 0), (2, 1), (2, 2), (2, 3), (2, 4)]);

        board.reveal(Position::new(0, 0)).unwrap();

        for y in 0..5 {
            assert_eq!(status(&board, 0, y), TileStatus::Number(0));
            assert!(matches!(status(&board, 1, y), TileStatus::Number(2 | 3)));
            assert_eq!(status(&board, 3, y), TileStatus::Hidden);
            assert_eq!(status(&board, 4, y), TileStatus::Hidden);
        }
        assert_eq!(board.count_revealed(), 10);
    }

    #[test]
    fn reveal_is_noop_on_revealed_and_marked() {
        let mut board = board(3, &[(0, 0)]);
        board.reveal(Position::new(1, 1)).unwrap();
        board.toggle_mark(Position::new(2, 2)).unwrap();
        let before = board.clone();

        assert_eq!(
            board.reveal(Position::new(1, 1)).unwrap(),
            RevealOutcome::NoChange
        );
        assert_eq!(
            board.reveal(Position::new(2, 2)).unwrap(),
            RevealOutcome::NoChange
        );
        assert_eq!(board, before);
    }

    #[test]
    fn revealed_mine_is_not_revealed_again() {
        let mut board = board(2, &[(0, 0)]);
        board.reveal(Position::new(0, 0)).unwrap();

        assert_eq!(
            board.reveal(Position::new(0, 0)).unwrap(),
            RevealOutcome::NoChange
        );
        assert_eq!(board.tiles().filter(|t| t.status() == TileStatus::Mine).count(), 1);
    }

    #[test]
    fn toggle_mark_round_trip() {
        let mut board = board(3, &[(0, 0)]);
        let center = Position::new(1, 1);

        assert_eq!(board.toggle_mark(center).unwrap(), MarkOutcome::Changed);
        assert_eq!(status(&board, 1, 1), TileStatus::Marked);
        assert_eq!(board.count_marked(), 1);
        assert_eq!(board.mines_left(), 0);

        assert_eq!(board.toggle_mark(center).unwrap(), MarkOutcome::Changed);
        assert_eq!(status(&board, 1, 1), TileStatus::Hidden);
        assert_eq!(board.count_marked(), 0);
    }

    #[test]
    fn toggle_mark_ignores_revealed_tiles() {
        let mut board = board(3, &[(0, 0)]);
        board.reveal(Position::new(1, 1)).unwrap();

        assert_eq!(
            board.toggle_mark(Position::new(1, 1)).unwrap(),
            MarkOutcome::NoChange
        );
        assert_eq!(board.count_marked(), 0);
    }

    #[test]
    fn mines_left_goes_negative_with_extra_marks() {
        let mut board = board(3, &[(0, 0)]);
        board.toggle_mark(Position::new(1, 1)).unwrap();
        board.toggle_mark(Position::new(2, 2)).unwrap();

        assert_eq!(board.mines_left(), -1);
    }

    #[test]
    fn out_of_bounds_moves_are_errors() {
        let mut board = board(3, &[]);
        let outside = Position::new(0, 3);
        let expected = GameError::OutOfBounds {
            position: outside,
            size: 3,
        };

        assert_eq!(board.reveal(outside).unwrap_err(), expected);
        assert_eq!(board.toggle_mark(outside).unwrap_err(), expected);
        assert_eq!(board.tile(outside).unwrap_err(), expected);
    }

    #[test]
    fn marked_mines_still_win() {
        let mut board = board(2, &[(0, 0)]);
        board.toggle_mark(Position::new(0, 0)).unwrap();
        board.reveal(Position::new(1, 0)).unwrap();
        board.reveal(Position::new(0, 1)).unwrap();

        let outcome = board.reveal(Position::new(1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert!(scan_won(&board));
    }

    #[test]
    fn mine_free_board_is_won_by_single_reveal() {
        let mut board = board(6, &[]);

        assert!(!board.is_won());
        assert_eq!(board.reveal(Position::new(3, 2)).unwrap(), RevealOutcome::Won);
        assert_eq!(board.count_revealed(), 36);
    }

    #[test]
    fn full_board_is_won_before_any_move() {
        let mines: Vec<_> = BoardConfig::new_unchecked(2, 4).positions().collect();
        let board = Board::new(2, mines).unwrap();

        assert!(board.is_won());
        assert_eq!(board.is_won(), scan_won(&board));
    }

    #[test]
    fn expose_mines_unmarks_and_reveals() {
        let mut board = board(3, &[(0, 0), (2, 2)]);
        board.toggle_mark(Position::new(2, 2)).unwrap();
        board.toggle_mark(Position::new(1, 2)).unwrap();
        board.reveal(Position::new(0, 0)).unwrap();

        board.expose_mines();

        assert_eq!(status(&board, 2, 2), TileStatus::Mine);
        assert_eq!(status(&board, 1, 2), TileStatus::Hidden);
        assert_eq!(board.count_marked(), 0);
        assert_eq!(board.triggered_mine(), Some(Position::new(0, 0)));
    }

    #[test]
    fn rows_follow_y_then_x() {
        let board = board(2, &[(1, 0)]);
        let rows: Vec<Vec<Position>> = board
            .rows()
            .map(|row| row.map(Tile::position).collect())
            .collect();

        assert_eq!(
            rows,
            [
                [Position::new(0, 0), Position::new(1, 0)],
                [Position::new(0, 1), Position::new(1, 1)],
            ]
        );
    }

    #[test]
    fn generated_board_matches_config() {
        let board = Board::generate(BoardConfig::beginner(), RandomMineGenerator::new(9)).unwrap();

        assert_eq!(board.size(), 9);
        assert_eq!(board.mine_count(), 10);
        assert_eq!(board.tiles().filter(|tile| tile.is_mine()).count(), 10);
    }

    #[test]
    fn generate_rejects_unchecked_config() {
        let config = BoardConfig::new_unchecked(2, 5);

        assert!(matches!(
            Board::generate(config, RandomMineGenerator::new(0)),
            Err(GameError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn board_round_trips_through_json() {
        let mut board = board(3, &[(0, 0)]);
        board.reveal(Position::new(1, 1)).unwrap();
        board.toggle_mark(Position::new(2, 2)).unwrap();

        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, board);
    }

    #[test]
    fn loading_rejects_size_that_does_not_match_tiles() {
        let mut value = serde_json::to_value(board(2, &[(0, 0)])).unwrap();
        value["size"] = 5.into();

        let err = serde_json::from_value::<Board>(value).unwrap_err();

        assert_eq!(err.to_string(), GameError::InvalidBoardShape.to_string());
    }

    #[test]
    fn loading_rejects_tiles_at_the_wrong_index() {
        let mut value = serde_json::to_value(board(2, &[(0, 0)])).unwrap();
        value["tiles"]["data"][3]["position"]["x"] = 0.into();

        let err = serde_json::from_value::<Board>(value).unwrap_err();

        assert_eq!(
            err.to_string(),
            GameError::InvalidTile(Position::new(1, 1)).to_string()
        );
    }

    #[test]
    fn loading_rejects_wrong_numbers_and_fake_mines() {
        let mut value = serde_json::to_value(board(2, &[(0, 0)])).unwrap();
        value["tiles"]["data"][3]["status"] = serde_json::json!({ "Number": 3 });
        assert!(serde_json::from_value::<Board>(value).is_err());

        let mut value = serde_json::to_value(board(2, &[(0, 0)])).unwrap();
        value["tiles"]["data"][1]["status"] = "Mine".into();
        assert!(serde_json::from_value::<Board>(value).is_err());
    }

    #[test]
    fn loading_rebuilds_counters_from_tiles() {
        let mut value = serde_json::to_value(board(2, &[(0, 0)])).unwrap();
        value["tiles"]["data"][3]["status"] = "Marked".into();
        value["tiles"]["data"][0]["status"] = "Mine".into();

        let mut board: Board = serde_json::from_value(value).unwrap();

        assert_eq!(board.count_marked(), 1);
        assert!(board.is_lost());
        assert_eq!(board.triggered_mine(), Some(Position::new(0, 0)));
        assert_eq!(
            board.toggle_mark(Position::new(1, 1)).unwrap(),
            MarkOutcome::Changed
        );
        assert_eq!(board.count_marked(), 0);
    }
}
