//! Pure position value: board, reserves and side to move.
//!
//! Every transition returns a fresh [`Position`]; the receiver is never
//! modified, so search branches can share an ancestor safely.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Action, Board, Piece, PieceKind, Player, Pos, Result, RulesError};

/// Why a game ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum WinReason {
    /// The loser's king is no longer on the board.
    KingCaptured,
    /// The winner's king stands on the enemy home row and nothing can take it.
    KingSafeInEnemyCamp,
}

impl fmt::Display for WinReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WinReason::KingCaptured => write!(f, "king captured"),
            WinReason::KingSafeInEnemyCamp => write!(f, "king safe in enemy camp"),
        }
    }
}

/// A finished game's result.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: Player,
    pub reason: WinReason,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wins: {}", self.winner, self.reason)
    }
}

/// Board, reserves and side to move. Also used as the undo snapshot.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Position {
    board: Board,
    /// Indexed by [`Player::index`]. Pieces are tagged with the holder.
    reserves: [Vec<Piece>; 2],
    side_to_move: Player,
}

impl Position {
    /// Create a position with empty reserves.
    pub fn new(board: Board, side_to_move: Player) -> Position {
        Position {
            board,
            reserves: [Vec::new(), Vec::new()],
            side_to_move,
        }
    }

    /// The starting position, Player One to move.
    pub fn initial() -> Position {
        Position::new(Board::initial(), Player::One)
    }

    /// Append pieces of the given kinds to a player's reserve.
    pub fn with_reserve(
        mut self,
        player: Player,
        kinds: impl IntoIterator<Item = PieceKind>,
    ) -> Position {
        self.reserves[player.index()].extend(kinds.into_iter().map(|k| Piece::new(k, player)));
        self
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The pieces `player` may drop, in capture order.
    #[inline]
    pub fn reserve(&self, player: Player) -> &[Piece] {
        &self.reserves[player.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    // ========== Move Generation ==========

    /// Cells the piece at `from` can reach, regardless of whose turn it is.
    ///
    /// Empty when `from` is empty. Enemy-occupied cells are included
    /// (captures), friendly-occupied cells are not.
    pub fn destinations(&self, from: Pos) -> Vec<Pos> {
        let Some(piece) = self.board.get(from) else {
            return Vec::new();
        };
        piece
            .kind
            .steps(piece.owner)
            .iter()
            .filter_map(|&(dr, dc)| from.offset(dr, dc))
            .filter(|&to| self.board.get(to).is_none_or(|target| target.owner != piece.owner))
            .collect()
    }

    /// Destinations for the piece at `from` if it belongs to the side to move.
    pub fn legal_moves(&self, from: Pos) -> Vec<Pos> {
        match self.board.get(from) {
            Some(piece) if piece.owner == self.side_to_move => self.destinations(from),
            _ => Vec::new(),
        }
    }

    /// Empty cells of the central drop zone.
    pub fn legal_drop_cells(&self) -> Vec<Pos> {
        Pos::DROP_ZONE
            .into_iter()
            .filter(|&pos| self.board.is_empty(pos))
            .collect()
    }

    /// Every move and drop available to `side`.
    ///
    /// Order: board moves by source cell then step order, followed by drops
    /// by reserve index then cell.
    pub fn actions_for(&self, side: Player) -> Vec<Action> {
        let mut actions = Vec::with_capacity(32);

        for (from, piece) in self.board.pieces() {
            if piece.owner == side {
                for to in self.destinations(from) {
                    actions.push(Action::Move { from, to });
                }
            }
        }

        let drop_cells = self.legal_drop_cells();
        for index in 0..self.reserve(side).len() {
            for &to in &drop_cells {
                actions.push(Action::Drop { index, to });
            }
        }

        actions
    }

    /// Every action for the side to move.
    pub fn legal_actions(&self) -> Vec<Action> {
        self.actions_for(self.side_to_move)
    }

    // ========== Win Detection ==========

    /// Whether any of `attacker`'s pieces could move onto `target`.
    pub fn attacks(&self, attacker: Player, target: Pos) -> bool {
        self.board
            .pieces()
            .filter(|(_, piece)| piece.owner == attacker)
            .any(|(from, _)| self.destinations(from).contains(&target))
    }

    /// Try rule: `player`'s king is on the enemy home row and unattacked.
    pub fn king_safe_in_enemy_camp(&self, player: Player) -> bool {
        match self.board.find_king(player) {
            Some(king) if king.row() == player.enemy_home_row() => {
                !self.attacks(player.opponent(), king)
            }
            _ => false,
        }
    }

    /// Check whether the position is won.
    ///
    /// King capture is checked before the try rule, Player One before
    /// Player Two.
    pub fn check_win(&self) -> Option<Outcome> {
        for player in Player::all() {
            if self.board.find_king(player).is_none() {
                return Some(Outcome {
                    winner: player.opponent(),
                    reason: WinReason::KingCaptured,
                });
            }
        }
        for player in Player::all() {
            if self.king_safe_in_enemy_camp(player) {
                return Some(Outcome {
                    winner: player,
                    reason: WinReason::KingSafeInEnemyCamp,
                });
            }
        }
        None
    }

    // ========== Apply ==========

    /// Apply an action for the side to move.
    pub fn apply(&self, action: Action) -> Result<Position> {
        self.apply_as(self.side_to_move, action)
    }

    /// Apply an action on behalf of `side`, returning the resulting position.
    ///
    /// The turn passes to the opponent unless the action wins the game, in
    /// which case `side` stays recorded as the side to move.
    pub fn apply_as(&self, side: Player, action: Action) -> Result<Position> {
        if self.check_win().is_some() {
            return Err(RulesError::GameOver);
        }

        let mut next = self.clone();
        match action {
            Action::Move { from, to } => {
                let piece = match self.board.get(from) {
                    Some(piece) if piece.owner == side => piece,
                    _ => return Err(RulesError::IllegalMove { from, to }),
                };
                if !self.destinations(from).contains(&to) {
                    return Err(RulesError::IllegalMove { from, to });
                }

                if let Some(captured) = next.board.take(to) {
                    next.reserves[side.index()].push(Piece::new(captured.kind.base(), side));
                }
                next.board.take(from);

                let kind = if piece.kind == PieceKind::Cannon && to.row() == side.enemy_home_row() {
                    PieceKind::Promoted
                } else {
                    piece.kind
                };
                next.board.set(to, Some(Piece::new(kind, side)));
            }
            Action::Drop { index, to } => {
                let len = self.reserve(side).len();
                if index >= len {
                    return Err(RulesError::InvalidIndex { index, len });
                }
                if !to.is_central() || !self.board.is_empty(to) {
                    return Err(RulesError::IllegalDrop { cell: to });
                }

                let piece = next.reserves[side.index()].remove(index);
                next.board.set(to, Some(Piece::new(piece.kind.base(), side)));
            }
        }

        next.side_to_move = if next.check_win().is_some() {
            side
        } else {
            side.opponent()
        };
        Ok(next)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        for player in Player::all() {
            write!(f, "reserve {}:", player as u8)?;
            for (index, piece) in self.reserve(player).iter().enumerate() {
                write!(f, " [{index}]{}", piece.symbol())?;
            }
            writeln!(f)?;
        }
        write!(f, "to move: {}", self.side_to_move)
    }
}
