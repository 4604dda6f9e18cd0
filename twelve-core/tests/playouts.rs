//! Random playout laws
//!
//! Plays seeded random games through `GameState` and checks the engine's
//! invariants after every action:
//! - apply followed by undo restores the exact prior position
//! - at most one king per side; a missing king means the game is over
//! - drops only target empty central cells
//! - cannons promote on arrival at the far row, drops never place a promoted piece

use rand::prelude::*;
use rand::rngs::StdRng;

use twelve_core::{
    Action, GameState, PieceKind, Player, Pos, Position, Status, WinReason,
};

const GAMES: usize = 200;
const MAX_PLIES: usize = 80;

fn random_games(seed: u64, mut check: impl FnMut(&GameState, Action, &GameState)) {
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..GAMES {
        let mut game = GameState::new();
        for _ in 0..MAX_PLIES {
            let actions = game.legal_actions();
            if actions.is_empty() {
                break;
            }
            let action = actions[rng.random_range(0..actions.len())];
            let before = game.clone();
            game.apply(action).expect("legal action rejected");
            check(&before, action, &game);
        }
    }
}

#[test]
fn test_apply_undo_roundtrip() {
    random_games(7, |before, _, after| {
        let mut restored = after.clone();
        restored.undo().unwrap();
        assert_eq!(restored.position(), before.position());
        assert_eq!(restored.history_len(), before.history_len());
    });
}

#[test]
fn test_king_invariant() {
    random_games(11, |_, _, after| {
        let board = after.position().board();
        for player in Player::all() {
            let kings = board.king_count(player);
            assert!(kings <= 1, "{player} has {kings} kings");
            if kings == 0 {
                match after.status() {
                    Status::Terminal(outcome) => {
                        assert_eq!(outcome.winner, player.opponent());
                        assert_eq!(outcome.reason, WinReason::KingCaptured);
                    }
                    Status::InProgress => panic!("{player} lost its king but the game goes on"),
                }
            }
        }
    });
}

#[test]
fn test_side_to_move_flips_unless_over() {
    random_games(13, |before, _, after| {
        if after.is_over() {
            assert_eq!(after.side_to_move(), before.side_to_move());
        } else {
            assert_eq!(after.side_to_move(), before.side_to_move().opponent());
        }
    });
}

#[test]
fn test_drop_cells_always_central_and_empty() {
    random_games(17, |_, _, after| {
        for cell in after.legal_drop_cells() {
            assert!(cell.is_central(), "home-row drop cell {cell}");
            assert!(after.position().board().is_empty(cell));
        }
    });
}

#[test]
fn test_promotion_and_drop_laws() {
    random_games(19, |before, action, after| {
        let mover = before.side_to_move();
        let board = after.position().board();
        match action {
            Action::Move { from, to } => {
                let moved = before.position().board().get(from).unwrap();
                let landed = board.get(to).unwrap();
                if moved.kind == PieceKind::Cannon && to.row() == mover.enemy_home_row() {
                    assert_eq!(landed.kind, PieceKind::Promoted);
                } else {
                    assert_eq!(landed.kind, moved.kind);
                }
            }
            Action::Drop { index, to } => {
                let dropped = before.reserve(mover)[index];
                let landed = board.get(to).unwrap();
                assert_ne!(landed.kind, PieceKind::Promoted);
                assert_eq!(landed.kind, dropped.kind.base());
                assert_eq!(landed.owner, mover);
            }
        }
        for player in Player::all() {
            for piece in after.reserve(player) {
                assert_eq!(piece.owner, player);
                assert_ne!(piece.kind, PieceKind::Promoted);
            }
        }
    });
}

#[test]
fn test_every_legal_destination_applies() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut game = GameState::new();
    for _ in 0..40 {
        if game.is_over() {
            break;
        }
        for from in Pos::all() {
            for to in game.legal_moves(from) {
                let mut probe = game.clone();
                assert!(probe.apply_move(from, to).is_ok());
            }
        }
        let actions = game.legal_actions();
        let action = actions[rng.random_range(0..actions.len())];
        game.apply(action).unwrap();
    }
}

#[test]
fn test_game_state_json_snapshot() {
    let mut game = GameState::new();
    game.apply_move(Pos::new(7).unwrap(), Pos::new(4).unwrap()).unwrap();

    let json = serde_json::to_string(&game).unwrap();
    let restored: GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, game);

    let mut restored = restored;
    restored.undo().unwrap();
    assert_eq!(restored.position(), &Position::initial());
}
