//! Search and match statistics.

use std::fmt;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};
use twelve_core::{Outcome, Player};

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Nodes visited, root included
    pub nodes: u64,
    /// Nodes scored statically (depth exhausted, decided, or no actions)
    pub leaves: u64,
    /// Beta cutoffs
    pub cutoffs: u64,
    /// Sibling actions skipped because of a cutoff
    pub pruned: u64,
}

impl SearchStats {
    /// Share of generated children that were never searched, in percent.
    pub fn pruning_pct(&self) -> f64 {
        let generated = self.nodes.saturating_sub(1) + self.pruned;
        if generated == 0 {
            return 0.0;
        }
        100.0 * self.pruned as f64 / generated as f64
    }
}

impl AddAssign for SearchStats {
    fn add_assign(&mut self, other: SearchStats) {
        self.nodes += other.nodes;
        self.leaves += other.leaves;
        self.cutoffs += other.cutoffs;
        self.pruned += other.pruned;
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nodes={} leaves={} cutoffs={} pruned={:.1}%",
            self.nodes,
            self.leaves,
            self.cutoffs,
            self.pruning_pct()
        )
    }
}

/// Win counts across games of one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub player_one_wins: u32,
    pub player_two_wins: u32,
    /// Games stopped at the ply cap without a result
    pub unfinished: u32,
    pub total_games: u32,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished game.
    pub fn record(&mut self, outcome: Outcome) {
        self.total_games += 1;
        match outcome.winner {
            Player::One => self.player_one_wins += 1,
            Player::Two => self.player_two_wins += 1,
        }
    }

    /// Record a game abandoned without a winner.
    pub fn record_unfinished(&mut self) {
        self.total_games += 1;
        self.unfinished += 1;
    }

    pub fn wins(&self, player: Player) -> u32 {
        match player {
            Player::One => self.player_one_wins,
            Player::Two => self.player_two_wins,
        }
    }

    /// Win rate of `player` over all recorded games, in percent.
    pub fn win_pct(&self, player: Player) -> f64 {
        if self.total_games == 0 {
            return 0.0;
        }
        100.0 * self.wins(player) as f64 / self.total_games as f64
    }

    /// Print final summary
    pub fn print_summary(&self) {
        println!("Games played: {}", self.total_games);
        println!(
            "  - Player 1 wins: {} ({:.1}%)",
            self.player_one_wins,
            self.win_pct(Player::One)
        );
        println!(
            "  - Player 2 wins: {} ({:.1}%)",
            self.player_two_wins,
            self.win_pct(Player::Two)
        );
        println!("  - Unfinished: {}", self.unfinished);
    }
}

impl fmt::Display for GameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P1 {} / P2 {} / unfinished {} ({} games)",
            self.player_one_wins, self.player_two_wins, self.unfinished, self.total_games
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twelve_core::WinReason;

    #[test]
    fn test_record_outcomes() {
        let mut stats = GameStats::new();
        stats.record(Outcome {
            winner: Player::One,
            reason: WinReason::KingCaptured,
        });
        stats.record(Outcome {
            winner: Player::Two,
            reason: WinReason::KingSafeInEnemyCamp,
        });
        stats.record(Outcome {
            winner: Player::One,
            reason: WinReason::KingSafeInEnemyCamp,
        });
        stats.record_unfinished();

        assert_eq!(stats.player_one_wins, 2);
        assert_eq!(stats.player_two_wins, 1);
        assert_eq!(stats.unfinished, 1);
        assert_eq!(stats.total_games, 4);
        assert_eq!(stats.win_pct(Player::One), 50.0);
        assert_eq!(stats.to_string(), "P1 2 / P2 1 / unfinished 1 (4 games)");
    }

    #[test]
    fn test_empty_rates() {
        assert_eq!(GameStats::new().win_pct(Player::Two), 0.0);
        assert_eq!(SearchStats::default().pruning_pct(), 0.0);
    }

    #[test]
    fn test_search_stats_accumulate() {
        let mut total = SearchStats::default();
        total += SearchStats {
            nodes: 10,
            leaves: 6,
            cutoffs: 1,
            pruned: 2,
        };
        total += SearchStats {
            nodes: 5,
            leaves: 3,
            cutoffs: 0,
            pruned: 0,
        };
        assert_eq!(total.nodes, 15);
        assert_eq!(total.leaves, 9);
        assert_eq!(total.cutoffs, 1);
        assert_eq!(total.pruned, 2);
    }
}
