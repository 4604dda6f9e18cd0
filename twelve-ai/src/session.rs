//! Explicit game driver: a human side, an AI side and the running score.
//!
//! After every human action the caller checks [`Session::is_ai_turn`] and, if
//! set, calls [`Session::advance`]. Nothing runs behind the caller's back.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use twelve_core::{Action, GameState, Outcome, Player, Position, RulesError};

use crate::stats::GameStats;
use crate::{Agent, Difficulty};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// The agent was asked to move for a side without moves or drops.
    #[error("{0} has no legal action")]
    NoLegalActions(Player),

    #[error("it is not the AI's turn")]
    NotAiTurn,
}

/// In-memory snapshot of a session. Undo history is not kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSession {
    pub position: Position,
    pub difficulty: Difficulty,
    pub ai_side: Option<Player>,
    pub stats: GameStats,
}

#[derive(Debug, Clone)]
pub struct Session {
    game: GameState,
    agent: Agent,
    /// None for human vs human
    ai_side: Option<Player>,
    stats: GameStats,
    /// Whether the current game's result is already in `stats`
    recorded: bool,
}

impl Session {
    pub fn new(difficulty: Difficulty, ai_side: Option<Player>) -> Session {
        Session {
            game: GameState::new(),
            agent: Agent::new(difficulty),
            ai_side,
            stats: GameStats::new(),
            recorded: false,
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn difficulty(&self) -> Difficulty {
        self.agent.difficulty()
    }

    pub fn ai_side(&self) -> Option<Player> {
        self.ai_side
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// The game is running and the side to move is played by the agent.
    pub fn is_ai_turn(&self) -> bool {
        !self.game.is_over() && self.ai_side == Some(self.game.side_to_move())
    }

    /// Apply an action for the side to move. Returns the outcome if this
    /// action ended the game.
    pub fn play(&mut self, action: Action) -> Result<Option<Outcome>, SessionError> {
        self.game.apply(action)?;
        Ok(self.finish_if_over())
    }

    /// Let the agent move if it is its turn; returns the action it played.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Action, SessionError> {
        if self.game.is_over() {
            return Err(RulesError::GameOver.into());
        }
        if !self.is_ai_turn() {
            return Err(SessionError::NotAiTurn);
        }

        let side = self.game.side_to_move();
        let action = self
            .agent
            .select_action(self.game.position(), side, rng)
            .ok_or(SessionError::NoLegalActions(side))?;
        debug!(%side, %action, difficulty = %self.difficulty(), "agent move");

        self.play(action)?;
        Ok(action)
    }

    /// Take back the last action. With an AI opponent the caller undoes
    /// twice to return to the human's turn.
    pub fn undo(&mut self) -> Result<(), SessionError> {
        self.game.undo()?;
        Ok(())
    }

    /// Start a fresh game, keeping difficulty, sides and stats.
    pub fn restart(&mut self) {
        self.game = GameState::new();
        self.recorded = false;
        info!("game restarted");
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.agent.set_difficulty(difficulty);
        info!(%difficulty, "difficulty changed");
    }

    pub fn set_ai_side(&mut self, ai_side: Option<Player>) {
        self.ai_side = ai_side;
    }

    pub fn save(&self) -> SavedSession {
        SavedSession {
            position: self.game.position().clone(),
            difficulty: self.difficulty(),
            ai_side: self.ai_side,
            stats: self.stats,
        }
    }

    /// Replace the session with a snapshot. The undo history starts empty.
    pub fn load(&mut self, saved: SavedSession) {
        self.recorded = saved.position.check_win().is_some();
        self.game = GameState::from_position(saved.position);
        self.agent.set_difficulty(saved.difficulty);
        self.ai_side = saved.ai_side;
        self.stats = saved.stats;
    }

    fn finish_if_over(&mut self) -> Option<Outcome> {
        let outcome = self.game.check_win()?;
        if !self.recorded {
            self.recorded = true;
            self.stats.record(outcome);
            info!(%outcome, stats = %self.stats, "game over");
        }
        Some(outcome)
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(Difficulty::default(), Some(Player::Two))
    }
}
