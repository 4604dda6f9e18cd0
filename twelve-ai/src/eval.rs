//! Static evaluation.
//!
//! Scores are integers in tenths of a material point, so the 0.1 positional
//! weight and the half-value reserve pieces stay exact.

use twelve_core::{PieceKind, Player, Pos, Position};

pub type Score = i32;

/// Added for a won position, subtracted for a lost one.
pub const WIN_SCORE: Score = 100_000;

/// Extra credit for a promoted cannon on the board.
const PROMOTED_BONUS: Score = 10;

/// King safety: standing on the enemy home row.
const KING_IN_ENEMY_CAMP: Score = 50;
/// King safety: per friendly piece on an adjacent cell.
const KING_ESCORT: Score = 3;
/// King safety counts double, in tenths.
const KING_SAFETY_WEIGHT: Score = 20;

/// Material value in tenths.
#[inline]
pub const fn piece_value(kind: PieceKind) -> Score {
    match kind {
        PieceKind::King => 10_000,
        PieceKind::General => 50,
        PieceKind::Promoted => 40,
        PieceKind::Guard => 30,
        PieceKind::Cannon => 20,
    }
}

/// Per-cell bonus by absolute cell index (row 0 first), already in tenths.
const POSITION_BONUS: [[Score; 12]; 5] = [
    // King
    [
        0, 2, 0, //
        1, 3, 1, //
        1, 3, 1, //
        0, 5, 0,
    ],
    // General
    [
        3, 1, 3, //
        2, 0, 2, //
        2, 0, 2, //
        3, 1, 3,
    ],
    // Guard
    [
        2, 0, 2, //
        1, 2, 1, //
        1, 2, 1, //
        2, 0, 2,
    ],
    // Cannon
    [
        0, 1, 0, //
        2, 3, 2, //
        2, 3, 2, //
        0, 1, 0,
    ],
    // Promoted
    [
        1, 2, 1, //
        3, 4, 3, //
        3, 4, 3, //
        1, 2, 1,
    ],
];

#[inline]
fn position_bonus(kind: PieceKind, pos: Pos) -> Score {
    let table = match kind {
        PieceKind::King => 0,
        PieceKind::General => 1,
        PieceKind::Guard => 2,
        PieceKind::Cannon => 3,
        PieceKind::Promoted => 4,
    };
    POSITION_BONUS[table][pos.index()]
}

/// Unweighted king safety for `player`'s king at `king`.
fn king_safety(position: &Position, king: Pos, player: Player) -> Score {
    let board = position.board();
    let mut safety = 0;
    if king.row() == player.enemy_home_row() {
        safety += KING_IN_ENEMY_CAMP;
    }
    for &(dr, dc) in PieceKind::King.steps(player) {
        if let Some(piece) = king.offset(dr, dc).and_then(|p| board.get(p)) {
            if piece.owner == player {
                safety += KING_ESCORT;
            }
        }
    }
    safety
}

/// Value of `position` from `side`'s point of view; higher is better.
///
/// Material and placement of every piece on the board, reserves at half
/// value, king safety, and a [`WIN_SCORE`] swing once the game is decided.
pub fn evaluate(position: &Position, side: Player) -> Score {
    let opponent = side.opponent();
    let board = position.board();
    let mut score: Score = 0;

    for (pos, piece) in board.pieces() {
        let mut value = piece_value(piece.kind) + position_bonus(piece.kind, pos);
        if piece.kind == PieceKind::Promoted {
            value += PROMOTED_BONUS;
        }
        if piece.owner == side {
            score += value;
        } else {
            score -= value;
        }
    }

    for piece in position.reserve(side) {
        score += piece_value(piece.kind) / 2;
    }
    for piece in position.reserve(opponent) {
        score -= piece_value(piece.kind) / 2;
    }

    if let Some(king) = board.find_king(side) {
        score += king_safety(position, king, side) * KING_SAFETY_WEIGHT;
    }
    if let Some(king) = board.find_king(opponent) {
        score -= king_safety(position, king, opponent) * KING_SAFETY_WEIGHT;
    }

    match position.check_win() {
        Some(outcome) if outcome.winner == side => score += WIN_SCORE,
        Some(_) => score -= WIN_SCORE,
        None => {}
    }

    score
}
