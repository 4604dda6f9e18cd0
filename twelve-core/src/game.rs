//! Game state with undo history: the single mutation point for drivers.

use serde::{Deserialize, Serialize};

use crate::{Action, Outcome, Piece, Player, Pos, Position, Result, RulesError};

/// Whether play continues.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Status {
    InProgress,
    Terminal(Outcome),
}

/// The canonical state of one game.
///
/// Every successful `apply*` pushes the pre-action [`Position`] so that
/// [`GameState::undo`] can restore it exactly. History is unbounded.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct GameState {
    position: Position,
    history: Vec<Position>,
}

impl GameState {
    /// Start a new game from the initial layout.
    pub fn new() -> GameState {
        GameState::from_position(Position::initial())
    }

    /// Start from an arbitrary position with empty history.
    pub fn from_position(position: Position) -> GameState {
        GameState {
            position,
            history: Vec::new(),
        }
    }

    /// The current position (a read-only snapshot for search).
    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn side_to_move(&self) -> Player {
        self.position.side_to_move()
    }

    #[inline]
    pub fn reserve(&self, player: Player) -> &[Piece] {
        self.position.reserve(player)
    }

    /// Number of actions that can be undone.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn check_win(&self) -> Option<Outcome> {
        self.position.check_win()
    }

    pub fn status(&self) -> Status {
        match self.check_win() {
            Some(outcome) => Status::Terminal(outcome),
            None => Status::InProgress,
        }
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.check_win().is_some()
    }

    /// Destinations for the piece at `from`; empty unless it belongs to the
    /// side to move.
    pub fn legal_moves(&self, from: Pos) -> Vec<Pos> {
        self.position.legal_moves(from)
    }

    pub fn legal_drop_cells(&self) -> Vec<Pos> {
        self.position.legal_drop_cells()
    }

    /// All actions for the side to move; empty once the game is over.
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.is_over() {
            return Vec::new();
        }
        self.position.legal_actions()
    }

    /// Apply an action for the side to move.
    ///
    /// On error nothing changes, history included.
    pub fn apply(&mut self, action: Action) -> Result<()> {
        let next = self.position.apply(action)?;
        let previous = std::mem::replace(&mut self.position, next);
        self.history.push(previous);
        Ok(())
    }

    pub fn apply_move(&mut self, from: Pos, to: Pos) -> Result<()> {
        self.apply(Action::Move { from, to })
    }

    pub fn apply_drop(&mut self, index: usize, to: Pos) -> Result<()> {
        self.apply(Action::Drop { index, to })
    }

    /// Restore the position before the most recent action.
    pub fn undo(&mut self) -> Result<()> {
        let previous = self.history.pop().ok_or(RulesError::NothingToUndo)?;
        self.position = previous;
        Ok(())
    }
}
