//! Minimax opponent for Twelve Janggi.
//!
//! The agent never owns game state: it reads a [`Position`] snapshot,
//! explores clones of it, and hands back an [`Action`] for the driver to
//! apply through [`twelve_core::GameState::apply`].
//!
//! # Example
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use twelve_ai::{Agent, Difficulty};
//! use twelve_core::GameState;
//!
//! let mut game = GameState::new();
//! let agent = Agent::new(Difficulty::Medium);
//! let mut rng = StdRng::seed_from_u64(1);
//!
//! let action = agent
//!     .select_action(game.position(), game.side_to_move(), &mut rng)
//!     .expect("opening position has moves");
//! game.apply(action).unwrap();
//! ```

pub mod eval;
pub mod movegen;
pub mod search;
pub mod session;
pub mod stats;

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use twelve_core::{Action, Player, Position};

pub use eval::{evaluate, Score, WIN_SCORE};
pub use movegen::{enumerate_actions, simulate};
pub use search::{search, select_action, SearchResult};
pub use session::{SavedSession, Session, SessionError};
pub use stats::{GameStats, SearchStats};

/// Opponent strength.
#[derive(
    Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniformly random legal action, no search.
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Search depth in plies.
    pub fn depth(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn all() -> impl Iterator<Item = Difficulty> {
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard].into_iter()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty {0:?} (expected easy, medium or hard)")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

/// An automated player with a fixed difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    difficulty: Difficulty,
}

impl Agent {
    pub fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Choose an action for `side`, or None if it has none.
    pub fn select_action<R: Rng + ?Sized>(
        &self,
        position: &Position,
        side: Player,
        rng: &mut R,
    ) -> Option<Action> {
        select_action(position, side, self.difficulty, rng)
    }
}
