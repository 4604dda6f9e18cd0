//! Candidate generation and branch simulation for search.

use twelve_core::{Action, Player, Position, Result};

/// All moves and drops for `side`, in the engine's enumeration order.
///
/// Empty once the position is decided: nothing can be applied to it.
/// Order only affects how much alpha-beta prunes and which of several
/// equally scored actions is kept; it never changes the best score.
pub fn enumerate_actions(position: &Position, side: Player) -> Vec<Action> {
    if position.check_win().is_some() {
        return Vec::new();
    }
    position.actions_for(side)
}

/// Apply `action` for `side` to a copy of `position`.
///
/// The input is left untouched, so sibling branches never observe each
/// other's changes.
#[inline]
pub fn simulate(position: &Position, action: Action, side: Player) -> Result<Position> {
    position.apply_as(side, action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use twelve_core::{Board, Piece, PieceKind, Pos};

    #[test]
    fn test_enumerate_for_either_side() {
        let position = Position::initial();
        assert_eq!(enumerate_actions(&position, Player::One).len(), 4);
        assert_eq!(enumerate_actions(&position, Player::Two).len(), 4);
    }

    #[test]
    fn test_enumerate_includes_drops() {
        let position = Position::initial()
            .with_reserve(Player::Two, [PieceKind::Guard, PieceKind::General]);
        let drops = enumerate_actions(&position, Player::Two)
            .into_iter()
            .filter(|a| matches!(a, Action::Drop { .. }))
            .count();
        // two reserve pieces × four empty central cells
        assert_eq!(drops, 8);
    }

    #[test]
    fn test_simulate_isolates_branches() {
        let root = Position::initial();
        let snapshot = root.clone();
        let actions = enumerate_actions(&root, Player::One);

        let children: Vec<Position> = actions
            .iter()
            .map(|&a| simulate(&root, a, Player::One).unwrap())
            .collect();

        assert_eq!(root, snapshot);
        for (i, a) in children.iter().enumerate() {
            for b in &children[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_simulate_rejects_illegal() {
        let root = Position::initial();
        let bad = Action::Move {
            from: Pos::new(0).unwrap(),
            to: Pos::new(3).unwrap(),
        };
        assert!(simulate(&root, bad, Player::One).is_err());
    }

    #[test]
    fn test_decided_position_has_no_actions() {
        // One's king already stands unattacked on Two's home row.
        let mut board = Board::empty();
        board.set(Pos::new(0).unwrap(), Some(Piece::new(PieceKind::King, Player::One)));
        board.set(Pos::new(5).unwrap(), Some(Piece::new(PieceKind::King, Player::Two)));
        let position = Position::new(board, Player::Two);

        assert!(position.check_win().is_some());
        assert!(!position.actions_for(Player::Two).is_empty());
        assert!(enumerate_actions(&position, Player::Two).is_empty());
        assert!(enumerate_actions(&position, Player::One).is_empty());
    }
}
