//! Errors returned by rules operations.

use thiserror::Error;

use crate::Pos;

/// Errors reported by the rules engine. The state is never modified when one
/// of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    /// A cell or reserve index outside its valid range.
    #[error("index {index} out of range (0..{len})")]
    InvalidIndex { index: usize, len: usize },

    /// The source cell is empty, belongs to the opponent, or cannot reach `to`.
    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: Pos, to: Pos },

    /// The target cell is occupied or outside the central drop zone.
    #[error("cannot drop onto cell {cell}")]
    IllegalDrop { cell: Pos },

    #[error("nothing to undo")]
    NothingToUndo,

    /// The position already has a winner.
    #[error("game is already over")]
    GameOver,
}

/// Result type alias for rules operations
pub type Result<T> = std::result::Result<T, RulesError>;
