//! WASM bindings for twelve-core
//!
//! Provides a JavaScript-friendly API for the game logic.

use wasm_bindgen::prelude::*;

use crate::{Action, GameState, Player, Pos, WinReason};

/// WASM-friendly wrapper around GameState
#[wasm_bindgen]
pub struct WasmGame {
    inner: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    /// Start a new game
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame {
            inner: GameState::new(),
        }
    }

    /// Current player (1 or 2)
    #[wasm_bindgen(js_name = currentPlayer)]
    pub fn current_player(&self) -> u8 {
        self.inner.side_to_move() as u8
    }

    /// Destinations for the piece at `cell`. Empty for bad cells.
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self, cell: u8) -> Vec<u8> {
        match Pos::new(cell) {
            Ok(from) => self.inner.legal_moves(from).into_iter().map(u8::from).collect(),
            Err(_) => vec![],
        }
    }

    /// Empty central cells a reserve piece may be dropped on
    #[wasm_bindgen(js_name = legalDropCells)]
    pub fn legal_drop_cells(&self) -> Vec<u8> {
        self.inner.legal_drop_cells().into_iter().map(u8::from).collect()
    }

    /// Move a piece. Returns true if successful.
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, from: u8, to: u8) -> bool {
        let (Ok(from), Ok(to)) = (Pos::new(from), Pos::new(to)) else {
            return false;
        };
        self.inner.apply(Action::Move { from, to }).is_ok()
    }

    /// Drop reserve piece `index`. Returns true if successful.
    #[wasm_bindgen(js_name = applyDrop)]
    pub fn apply_drop(&mut self, index: usize, cell: u8) -> bool {
        let Ok(to) = Pos::new(cell) else {
            return false;
        };
        self.inner.apply(Action::Drop { index, to }).is_ok()
    }

    /// Step back one action. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.inner.undo().is_ok()
    }

    /// Winner: 0 (none), 1 (P1), or 2 (P2)
    pub fn winner(&self) -> u8 {
        match self.inner.check_win() {
            None => 0,
            Some(outcome) if outcome.winner == Player::One => 1,
            Some(_) => 2,
        }
    }

    /// "ongoing", "king_captured" or "king_safe_in_enemy_camp"
    #[wasm_bindgen(js_name = winReason)]
    pub fn win_reason(&self) -> String {
        match self.inner.check_win().map(|o| o.reason) {
            None => "ongoing".to_string(),
            Some(WinReason::KingCaptured) => "king_captured".to_string(),
            Some(WinReason::KingSafeInEnemyCamp) => "king_safe_in_enemy_camp".to_string(),
        }
    }

    /// Full state (position and history) as a JS object
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(JsValue::from)
    }

    /// Replace the state with one produced by `snapshot`
    pub fn restore(&mut self, value: JsValue) -> Result<(), JsValue> {
        self.inner = serde_wasm_bindgen::from_value(value).map_err(JsValue::from)?;
        Ok(())
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
