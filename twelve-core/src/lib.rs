//! Twelve Janggi rules engine.
//!
//! # Board Layout
//!
//! ```text
//!   row 0   0  1  2    <- Player Two's home row
//!   row 1   3  4  5    \
//!   row 2   6  7  8    /  drop zone
//!   row 3   9 10 11    <- Player One's home row
//! ```
//!
//! Cell index = row * 3 + column. Player One moves "up" the board (towards
//! row 0), Player Two moves "down" (towards row 3).
//!
//! # Starting Position
//!
//! ```text
//!   a  k  g
//!   .  c  .
//!   .  C  .
//!   A  K  G
//! ```
//!
//! Uppercase pieces belong to Player One. `K` king, `G` general, `A` guard,
//! `C` cannon, `P` promoted cannon.
//!
//! # State Model
//!
//! [`Position`] is the pure value (board, reserves, side to move) that search
//! clones freely. [`GameState`] wraps a position with its undo history and is
//! the only thing a driver mutates.

mod error;
mod game;
mod position;

#[cfg(feature = "wasm")]
pub mod wasm;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use error::{Result, RulesError};
pub use game::{GameState, Status};
pub use position::{Outcome, Position, WinReason};

/// Number of rows on the board.
pub const ROWS: u8 = 4;
/// Number of columns on the board.
pub const COLS: u8 = 3;
/// Number of cells on the board.
pub const CELLS: usize = (ROWS * COLS) as usize;

/// Player identifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    One = 1,
    Two = 2,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Convert from u8 (1 or 2) to Player.
    #[inline]
    pub fn from_bits(bits: u8) -> Option<Player> {
        match bits {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    /// Zero-based index, used for per-player arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// Row delta of a single forward step.
    #[inline]
    pub fn forward(self) -> i8 {
        match self {
            Player::One => -1,
            Player::Two => 1,
        }
    }

    /// The row this player starts on.
    #[inline]
    pub fn home_row(self) -> u8 {
        match self {
            Player::One => ROWS - 1,
            Player::Two => 0,
        }
    }

    /// The opponent's home row: promotion row for cannons, target row for the try rule.
    #[inline]
    pub fn enemy_home_row(self) -> u8 {
        self.opponent().home_row()
    }

    /// Both players, Player One first.
    pub fn all() -> impl Iterator<Item = Player> {
        [Player::One, Player::Two].into_iter()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", *self as u8)
    }
}

const KING_STEPS: &[(i8, i8)] = &[
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];
const GENERAL_STEPS: &[(i8, i8)] = &[(1, 0), (-1, 0), (0, 1), (0, -1)];
const GUARD_STEPS: &[(i8, i8)] = &[(1, 1), (1, -1), (-1, 1), (-1, -1)];
const CANNON_STEPS_ONE: &[(i8, i8)] = &[(-1, 0)];
const CANNON_STEPS_TWO: &[(i8, i8)] = &[(1, 0)];
// Orthogonals plus the two forward diagonals.
const PROMOTED_STEPS_ONE: &[(i8, i8)] = &[(1, 0), (-1, 0), (0, 1), (0, -1), (-1, 1), (-1, -1)];
const PROMOTED_STEPS_TWO: &[(i8, i8)] = &[(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (1, -1)];

/// Piece type.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    King,
    General,
    Guard,
    Cannon,
    /// A cannon that reached the far row. Board-only: it reverts to
    /// [`PieceKind::Cannon`] when captured or dropped.
    Promoted,
}

impl PieceKind {
    /// Get all kinds as an iterator.
    pub fn all() -> impl Iterator<Item = PieceKind> {
        [
            PieceKind::King,
            PieceKind::General,
            PieceKind::Guard,
            PieceKind::Cannon,
            PieceKind::Promoted,
        ]
        .into_iter()
    }

    /// The kind this piece has off the board.
    #[inline]
    pub fn base(self) -> PieceKind {
        match self {
            PieceKind::Promoted => PieceKind::Cannon,
            kind => kind,
        }
    }

    /// Single-step (row, column) offsets this kind may move by for `owner`.
    pub fn steps(self, owner: Player) -> &'static [(i8, i8)] {
        match (self, owner) {
            (PieceKind::King, _) => KING_STEPS,
            (PieceKind::General, _) => GENERAL_STEPS,
            (PieceKind::Guard, _) => GUARD_STEPS,
            (PieceKind::Cannon, Player::One) => CANNON_STEPS_ONE,
            (PieceKind::Cannon, Player::Two) => CANNON_STEPS_TWO,
            (PieceKind::Promoted, Player::One) => PROMOTED_STEPS_ONE,
            (PieceKind::Promoted, Player::Two) => PROMOTED_STEPS_TWO,
        }
    }

    /// One-letter symbol (uppercase).
    pub fn symbol(self) -> char {
        match self {
            PieceKind::King => 'K',
            PieceKind::General => 'G',
            PieceKind::Guard => 'A',
            PieceKind::Cannon => 'C',
            PieceKind::Promoted => 'P',
        }
    }
}

/// A piece on the board or in a reserve.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub owner: Player,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, owner: Player) -> Piece {
        Piece { kind, owner }
    }

    /// Uppercase for Player One, lowercase for Player Two.
    pub fn symbol(self) -> char {
        match self.owner {
            Player::One => self.kind.symbol(),
            Player::Two => self.kind.symbol().to_ascii_lowercase(),
        }
    }
}

/// Position on the 4x3 board (0-11).
///
/// Always in range: construct through [`Pos::new`] or [`Pos::from_row_col`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Pos(u8);

impl Pos {
    /// The six central cells where reserve pieces may be dropped.
    pub const DROP_ZONE: [Pos; 6] = [Pos(3), Pos(4), Pos(5), Pos(6), Pos(7), Pos(8)];

    /// Create a position from a cell index.
    pub fn new(index: u8) -> Result<Pos> {
        if (index as usize) < CELLS {
            Ok(Pos(index))
        } else {
            Err(RulesError::InvalidIndex {
                index: index as usize,
                len: CELLS,
            })
        }
    }

    /// Create a position from row and column, or None if off the board.
    #[inline]
    pub fn from_row_col(row: i8, col: i8) -> Option<Pos> {
        if (0..ROWS as i8).contains(&row) && (0..COLS as i8).contains(&col) {
            Some(Pos(row as u8 * COLS + col as u8))
        } else {
            None
        }
    }

    /// Get the row (0-3).
    #[inline]
    pub fn row(self) -> u8 {
        self.0 / COLS
    }

    /// Get the column (0-2).
    #[inline]
    pub fn col(self) -> u8 {
        self.0 % COLS
    }

    /// Cell index, for indexing board arrays.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The cell reached by stepping `(dr, dc)`, if it is on the board.
    #[inline]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Pos> {
        Pos::from_row_col(self.row() as i8 + dr, self.col() as i8 + dc)
    }

    /// Rows 1 and 2: the only cells a reserve piece may be dropped on.
    #[inline]
    pub fn is_central(self) -> bool {
        self.row() == 1 || self.row() == 2
    }

    /// Iterate over all 12 positions.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..CELLS as u8).map(Pos)
    }
}

impl TryFrom<u8> for Pos {
    type Error = RulesError;

    fn try_from(index: u8) -> Result<Pos> {
        Pos::new(index)
    }
}

impl From<Pos> for u8 {
    fn from(pos: Pos) -> u8 {
        pos.0
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An action for the side to move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Move a piece on the board; captures are implicit.
    Move { from: Pos, to: Pos },
    /// Drop the reserve piece at `index` onto an empty central cell.
    Drop { index: usize, to: Pos },
}

impl Action {
    /// Get the destination position of the action.
    #[inline]
    pub fn to(&self) -> Pos {
        match self {
            Action::Move { to, .. } => *to,
            Action::Drop { to, .. } => *to,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move { from, to } => write!(f, "m {from} {to}"),
            Action::Drop { index, to } => write!(f, "d {index} {to}"),
        }
    }
}

/// The 12 cells, row-major.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Piece>; CELLS],
}

impl Board {
    /// Create an empty board.
    pub fn empty() -> Board {
        Board::default()
    }

    /// Create the starting layout.
    pub fn initial() -> Board {
        let mut board = Board::empty();
        for owner in Player::all() {
            let home = owner.home_row() as i8;
            let front = home + owner.forward();
            let layout = [
                (home, 0, PieceKind::Guard),
                (home, 1, PieceKind::King),
                (home, 2, PieceKind::General),
                (front, 1, PieceKind::Cannon),
            ];
            for (row, col, kind) in layout {
                if let Some(pos) = Pos::from_row_col(row, col) {
                    board.set(pos, Some(Piece::new(kind, owner)));
                }
            }
        }
        board
    }

    /// Get the piece at a position.
    #[inline]
    pub fn get(&self, pos: Pos) -> Option<Piece> {
        self.cells[pos.index()]
    }

    /// Set or clear a cell.
    #[inline]
    pub fn set(&mut self, pos: Pos, piece: Option<Piece>) {
        self.cells[pos.index()] = piece;
    }

    /// Clear a cell, returning what was there.
    #[inline]
    pub fn take(&mut self, pos: Pos) -> Option<Piece> {
        self.cells[pos.index()].take()
    }

    /// Check if a cell is empty.
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.cells[pos.index()].is_none()
    }

    /// Occupied cells in index order.
    pub fn pieces(&self) -> impl Iterator<Item = (Pos, Piece)> + '_ {
        Pos::all().filter_map(|pos| self.get(pos).map(|piece| (pos, piece)))
    }

    /// Where the player's king stands, if it is still on the board.
    pub fn find_king(&self, player: Player) -> Option<Pos> {
        self.pieces()
            .find(|(_, p)| p.owner == player && p.kind == PieceKind::King)
            .map(|(pos, _)| pos)
    }

    /// Count of the player's kings on the board.
    pub fn king_count(&self, player: Player) -> usize {
        self.pieces()
            .filter(|(_, p)| p.owner == player && p.kind == PieceKind::King)
            .count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            for col in 0..COLS {
                let pos = Pos(row * COLS + col);
                let symbol = self.get(pos).map(Piece::symbol).unwrap_or('.');
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_opponent() {
        assert_eq!(Player::One.opponent(), Player::Two);
        assert_eq!(Player::Two.opponent(), Player::One);
    }

    #[test]
    fn test_player_rows() {
        assert_eq!(Player::One.home_row(), 3);
        assert_eq!(Player::Two.home_row(), 0);
        assert_eq!(Player::One.enemy_home_row(), 0);
        assert_eq!(Player::Two.enemy_home_row(), 3);
        assert_eq!(Player::One.forward(), -1);
        assert_eq!(Player::Two.forward(), 1);
    }

    #[test]
    fn test_pos_new_rejects_out_of_range() {
        assert!(Pos::new(11).is_ok());
        assert_eq!(
            Pos::new(12),
            Err(RulesError::InvalidIndex { index: 12, len: 12 })
        );
    }

    #[test]
    fn test_pos_row_col() {
        for pos in Pos::all() {
            assert_eq!(
                Pos::from_row_col(pos.row() as i8, pos.col() as i8),
                Some(pos)
            );
        }
        assert_eq!(Pos::from_row_col(-1, 0), None);
        assert_eq!(Pos::from_row_col(0, 3), None);
        assert_eq!(Pos::from_row_col(4, 0), None);
    }

    #[test]
    fn test_drop_zone_is_central() {
        let central: Vec<Pos> = Pos::all().filter(|p| p.is_central()).collect();
        assert_eq!(central, Pos::DROP_ZONE.to_vec());
    }

    #[test]
    fn test_promoted_steps_exclude_backward_diagonals() {
        for owner in Player::all() {
            let steps = PieceKind::Promoted.steps(owner);
            assert_eq!(steps.len(), 6);
            let back = -owner.forward();
            assert!(!steps.contains(&(back, 1)));
            assert!(!steps.contains(&(back, -1)));
            assert!(steps.contains(&(back, 0)));
        }
    }

    #[test]
    fn test_initial_board() {
        let board = Board::initial();
        let expected = "a k g\n. c .\n. C .\nA K G\n";
        assert_eq!(board.to_string(), expected);
        assert_eq!(board.find_king(Player::One), Pos::new(10).ok());
        assert_eq!(board.find_king(Player::Two), Pos::new(1).ok());
        assert_eq!(board.pieces().count(), 8);
    }

    #[test]
    fn test_board_take() {
        let mut board = Board::initial();
        let pos = Pos::new(7).unwrap();
        assert_eq!(
            board.take(pos),
            Some(Piece::new(PieceKind::Cannon, Player::One))
        );
        assert!(board.is_empty(pos));
        assert_eq!(board.take(pos), None);
    }

    #[test]
    fn test_action_display() {
        let mv = Action::Move {
            from: Pos::new(11).unwrap(),
            to: Pos::new(8).unwrap(),
        };
        let drop = Action::Drop {
            index: 0,
            to: Pos::new(4).unwrap(),
        };
        assert_eq!(mv.to_string(), "m 11 8");
        assert_eq!(drop.to_string(), "d 0 4");
        assert_eq!(mv.to(), Pos::new(8).unwrap());
    }

    #[test]
    fn test_pos_serde_validates() {
        let pos: Pos = serde_json::from_str("5").unwrap();
        assert_eq!(pos, Pos::new(5).unwrap());
        assert!(serde_json::from_str::<Pos>("12").is_err());
    }
}
