//! Minimax search with alpha-beta pruning.
//!
//! Every node is scored from the root side's perspective: the root side's
//! plies maximize `evaluate(·, root)` and the opponent's plies minimize the
//! very same function.

use rand::Rng;
use tracing::debug;
use twelve_core::{Action, Player, Position};

use crate::eval::{evaluate, Score};
use crate::movegen::{enumerate_actions, simulate};
use crate::stats::SearchStats;
use crate::Difficulty;

/// Result of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// The best action found (None if `side` has no legal action)
    pub action: Option<Action>,
    /// Score of `action` from the searching side's perspective
    pub score: Score,
    /// Depth searched, in plies
    pub depth: u8,
    pub stats: SearchStats,
}

/// Searches `position` for `side` to `depth` plies.
///
/// Deterministic: among equally scored actions the first one enumerated
/// wins.
pub fn search(position: &Position, side: Player, depth: u8) -> SearchResult {
    let mut stats = SearchStats::default();
    let (score, action) = minimax(
        position,
        side,
        side,
        depth,
        true,
        Score::MIN,
        Score::MAX,
        &mut stats,
    );

    debug!(
        %side,
        depth,
        score,
        nodes = stats.nodes,
        cutoffs = stats.cutoffs,
        action = ?action,
        "search finished"
    );

    SearchResult {
        action,
        score,
        depth,
        stats,
    }
}

/// Recursive minimax with alpha-beta pruning.
///
/// `to_move` plays at this node; `perspective` is the root side every leaf
/// is evaluated for. Returns (score, best action at this node).
#[allow(clippy::too_many_arguments)]
fn minimax(
    position: &Position,
    to_move: Player,
    perspective: Player,
    depth: u8,
    maximizing: bool,
    mut alpha: Score,
    mut beta: Score,
    stats: &mut SearchStats,
) -> (Score, Option<Action>) {
    stats.nodes += 1;

    if depth == 0 || position.check_win().is_some() {
        stats.leaves += 1;
        return (evaluate(position, perspective), None);
    }

    let actions = enumerate_actions(position, to_move);
    if actions.is_empty() {
        stats.leaves += 1;
        return (evaluate(position, perspective), None);
    }

    let mut best = if maximizing { Score::MIN } else { Score::MAX };
    let mut best_action = None;

    for (i, &action) in actions.iter().enumerate() {
        let Ok(child) = simulate(position, action, to_move) else {
            debug_assert!(false, "enumerated action {action} rejected");
            continue;
        };
        let (score, _) = minimax(
            &child,
            to_move.opponent(),
            perspective,
            depth - 1,
            !maximizing,
            alpha,
            beta,
            stats,
        );

        let improves = if maximizing { score > best } else { score < best };
        if improves || best_action.is_none() {
            best = score;
            best_action = Some(action);
        }

        if maximizing {
            alpha = alpha.max(score);
        } else {
            beta = beta.min(score);
        }
        if beta <= alpha {
            stats.cutoffs += 1;
            stats.pruned += (actions.len() - i - 1) as u64;
            break;
        }
    }

    (best, best_action)
}

/// Choose an action for `side` at the given difficulty.
///
/// Easy picks uniformly at random; Medium and Hard run [`search`] to their
/// depth. None only when [`enumerate_actions`] is empty, which includes a
/// position that is already decided.
pub fn select_action<R: Rng + ?Sized>(
    position: &Position,
    side: Player,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<Action> {
    match difficulty {
        Difficulty::Easy => {
            let actions = enumerate_actions(position, side);
            if actions.is_empty() {
                return None;
            }
            Some(actions[rng.random_range(0..actions.len())])
        }
        Difficulty::Medium | Difficulty::Hard => search(position, side, difficulty.depth()).action,
    }
}
