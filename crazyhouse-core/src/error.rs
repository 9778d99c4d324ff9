//! Error types.
//!
//! Rule violations never escape the boolean contract of `apply_move` /
//! `apply_drop`; they are exposed for callers that want to know why an
//! action was refused.

use thiserror::Error;

use crate::piece::{Color, PieceKind};
use crate::square::Square;

/// Why a move or drop was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("no piece at source square {0:?}")]
    NoPieceAtSource(Square),

    #[error("it is {to_move:?}'s turn, not {attempted:?}'s")]
    NotYourTurn { to_move: Color, attempted: Color },

    #[error("destination {0:?} holds a piece of the mover's color")]
    OccupiedByOwnPiece(Square),

    #[error("{kind:?} cannot reach {to:?} from {from:?}")]
    IllegalGeometry { kind: PieceKind, from: Square, to: Square },

    #[error("action would leave the {0:?} king in check")]
    LeavesKingInCheck(Color),

    #[error("drop target {0:?} is not empty")]
    SquareOccupied(Square),

    #[error("pawns cannot be dropped on a back rank ({0:?})")]
    PawnOnBackRank(Square),

    #[error("no {kind:?} in {color:?}'s pocket")]
    NotInPocket { kind: PieceKind, color: Color },
}

/// Errors building a board from outside input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("square ({row}, {col}) is off the board")]
    OutOfBounds { row: u8, col: u8 },

    #[error("invalid piece token {token:?} at ({row}, {col})")]
    InvalidToken { token: char, row: u8, col: u8 },

    #[error("row {row} has {len} squares, expected 8")]
    BadRowLength { row: u8, len: usize },
}
