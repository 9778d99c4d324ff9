//! WASM bindings for crazyhouse-core
//!
//! Provides a JavaScript-friendly API for the browser board. Pieces cross
//! the boundary as one-letter tokens (uppercase White, lowercase Black).

use wasm_bindgen::prelude::*;

use crate::{Color, GameState, Piece, Square};

/// WASM-friendly wrapper around GameState
#[wasm_bindgen]
pub struct WasmGame {
    inner: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a game in the starting position
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame { inner: GameState::new() }
    }

    /// Back to the starting position
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Token of the piece at (row, col), or undefined
    #[wasm_bindgen(js_name = pieceAt)]
    pub fn piece_at(&self, row: u8, col: u8) -> Option<String> {
        let sq = Square::new(row, col)?;
        self.inner.piece_at(sq).map(|p| p.to_char().to_string())
    }

    /// Side to move: "white" or "black"
    pub fn turn(&self) -> String {
        self.inner.turn().name().to_string()
    }

    /// Pocket of a color as [{ piece, count }], first-captured kind first.
    /// Tokens are cased for the pocket's owner.
    pub fn pocket(&self, color: &str) -> JsValue {
        let Some(color) = Color::from_name(color) else {
            return JsValue::NULL;
        };
        let entries: Vec<PocketEntry> = self
            .inner
            .pocket(color)
            .counts()
            .into_iter()
            .map(|(kind, count)| PocketEntry {
                piece: Piece::new(kind, color).to_char().to_string(),
                count,
            })
            .collect();
        serde_wasm_bindgen::to_value(&entries).unwrap_or(JsValue::NULL)
    }

    /// Is the given color's king attacked?
    #[wasm_bindgen(js_name = inCheck)]
    pub fn in_check(&self, color: &str) -> bool {
        Color::from_name(color).is_some_and(|c| self.inner.in_check(c))
    }

    /// Legal destinations for the piece at (row, col) as [row, col, row, col, ...]
    #[wasm_bindgen(js_name = legalTargets)]
    pub fn legal_targets(&mut self, row: u8, col: u8) -> Vec<u8> {
        let Some(from) = Square::new(row, col) else {
            return vec![];
        };
        self.inner
            .legal_moves_from(from)
            .into_iter()
            .flat_map(|sq| [sq.row(), sq.col()])
            .collect()
    }

    /// Move a piece. Returns true if successful.
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, from_row: u8, from_col: u8, to_row: u8, to_col: u8) -> bool {
        match (Square::new(from_row, from_col), Square::new(to_row, to_col)) {
            (Some(from), Some(to)) => self.inner.apply_move(from, to),
            _ => false,
        }
    }

    /// Drop a pocket piece given by token. The token's case must match the
    /// side to move. Returns true if successful.
    #[wasm_bindgen(js_name = applyDrop)]
    pub fn apply_drop(&mut self, row: u8, col: u8, token: &str) -> bool {
        match (Square::new(row, col), Piece::from_token(token)) {
            (Some(sq), Some(piece)) => self.inner.try_drop(sq, piece).is_ok(),
            _ => false,
        }
    }

    /// Clone the game
    #[wasm_bindgen(js_name = clone)]
    pub fn clone_game(&self) -> WasmGame {
        WasmGame { inner: self.inner.clone() }
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable pocket entry for JavaScript
#[derive(serde::Serialize)]
struct PocketEntry {
    piece: String,
    count: usize,
}
