use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Ready,
    Active,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Ready
    }
}

/// One game as seen by a front end: the board plus the rules around it.
///
/// Moves are rejected once the game is won or lost. Losing exposes every mine and drops all marks,
/// so the board can be drawn as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSession")]
pub struct GameSession {
    board: Board,
    state: SessionState,
}

impl GameSession {
    pub fn new(config: BoardConfig, generator: impl MineGenerator) -> Result<Self> {
        Ok(Self::from_board(Board::generate(config, generator)?))
    }

    pub fn with_seed(config: BoardConfig, seed: u64) -> Result<Self> {
        Self::new(config, RandomMineGenerator::new(seed))
    }

    /// Resumes a game, deriving its state from the tiles.
    pub fn from_board(mut board: Board) -> Self {
        let state = if board.is_lost() {
            board.expose_mines();
            SessionState::Lost
        } else if board.is_won() {
            SessionState::Won
        } else if board.count_revealed() > 0 {
            SessionState::Active
        } else {
            SessionState::Ready
        };
        Self { board, state }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn config(&self) -> BoardConfig {
        self.board.config()
    }

    /// Value for the mines-remaining counter.
    pub fn mines_left(&self) -> isize {
        self.board.mines_left()
    }

    pub fn reveal(&mut self, position: Position) -> Result<RevealOutcome> {
        let position = self.board.validate_position(position)?;
        self.check_not_finished()?;

        let outcome = self.board.reveal(position)?;
        match outcome {
            RevealOutcome::NoChange => {}
            RevealOutcome::Revealed => self.mark_started(),
            RevealOutcome::HitMine => self.end_game(false),
            RevealOutcome::Won => self.end_game(true),
        }
        Ok(outcome)
    }

    pub fn toggle_mark(&mut self, position: Position) -> Result<MarkOutcome> {
        let position = self.board.validate_position(position)?;
        self.check_not_finished()?;

        self.board.toggle_mark(position)
    }

    /// Starts over with a fresh layout of the same size and mine count.
    pub fn restart(&mut self, generator: impl MineGenerator) -> Result<()> {
        *self = Self::new(self.config(), generator)?;
        log::debug!("Restarted session, state: {:?}", self.state);
        Ok(())
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    fn mark_started(&mut self) {
        if self.state.is_ready() {
            log::debug!("Session started");
            self.state = SessionState::Active;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        if won {
            self.state = SessionState::Won;
        } else {
            self.state = SessionState::Lost;
            self.board.expose_mines();
        }
        log::debug!("Session ended: {:?}", self.state);
    }
}

/// Stored form of a session, the state is derived again from the board on load.
#[derive(Deserialize)]
struct RawSession {
    board: Board,
}

impl From<RawSession> for GameSession {
    fn from(raw: RawSession) -> Self {
        Self::from_board(raw.board)
    }
}
