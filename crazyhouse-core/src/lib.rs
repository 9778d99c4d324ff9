//! Crazyhouse rules engine.
//!
//! Crazyhouse is chess where captured pieces change sides and go into the
//! capturer's pocket, from which they can later be dropped onto any empty
//! square instead of making a board move.
//!
//! # Board Layout
//!
//! ```text
//! Squares are (row, col), both 0-7, stored row-major (index = row * 8 + col).
//!
//!   row 0:  r n b q k b n r    <- Black's back rank
//!   row 1:  p p p p p p p p
//!   row 6:  P P P P P P P P
//!   row 7:  R N B Q K B N R    <- White's back rank
//!
//! White pawns move toward row 0 and promote there; Black toward row 7.
//! ```
//!
//! # Piece Tokens
//!
//! ```text
//! P N B R Q K    White (uppercase)
//! p n b r q k    Black (lowercase)
//! ```
//!
//! Tokens exist only at the edges (parsing, display, the JS binding).
//! Internally a piece is a `(PieceKind, Color)` pair.
//!
//! # Rules in Scope
//!
//! Piece movement, capture into the pocket, drops (no pawns on rows 0 and 7),
//! the self-check filter for both moves and drops, and automatic promotion to
//! a queen. There is no castling, en passant, or game-over detection: the
//! engine answers "is this legal" and "apply this", nothing more.

pub mod board;
pub mod error;
pub mod game;
pub mod piece;
pub mod pocket;
pub mod square;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use board::Board;
pub use error::{BoardError, RuleViolation};
pub use game::{Action, GameState};
pub use piece::{Color, Piece, PieceKind};
pub use pocket::Pocket;
pub use square::Square;
