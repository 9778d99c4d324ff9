//! Game state and the legality machine on top of [`Board`].
//!
//! Every legality query that needs to know "would my king be in check
//! afterwards" edits the board in place through a `Speculation` guard and
//! lets the guard put it back. Rejected actions leave the state untouched.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::board::Board;
use crate::error::RuleViolation;
use crate::piece::{Color, Piece, PieceKind};
use crate::pocket::Pocket;
use crate::square::Square;

/// A single action by the side to move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Move a piece on the board, capturing whatever opposing piece is on `to`.
    Move { from: Square, to: Square },
    /// Place a piece of `kind` from the mover's pocket onto an empty square.
    Drop { kind: PieceKind, to: Square },
}

/// Board, both pockets, and the side to move.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GameState {
    board: Board,
    white_pocket: Pocket,
    black_pocket: Pocket,
    turn: Color,
}

impl GameState {
    /// Standard starting position, empty pockets, White to move.
    pub fn new() -> GameState {
        GameState::from_position(Board::standard(), Color::White)
    }

    /// Arbitrary position with empty pockets. No legality checks are applied.
    pub fn from_position(board: Board, turn: Color) -> GameState {
        GameState {
            board,
            white_pocket: Pocket::new(),
            black_pocket: Pocket::new(),
            turn,
        }
    }

    /// Return to the starting position, identical to a fresh [`GameState::new`].
    pub fn reset(&mut self) {
        *self = GameState::new();
        debug!("game reset");
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.get(sq)
    }

    pub fn pocket(&self, color: Color) -> &Pocket {
        match color {
            Color::White => &self.white_pocket,
            Color::Black => &self.black_pocket,
        }
    }

    /// Mutable pocket access, for seeding positions.
    pub fn pocket_mut(&mut self, color: Color) -> &mut Pocket {
        match color {
            Color::White => &mut self.white_pocket,
            Color::Black => &mut self.black_pocket,
        }
    }

    #[inline]
    pub fn white_pocket(&self) -> &Pocket {
        &self.white_pocket
    }

    #[inline]
    pub fn black_pocket(&self) -> &Pocket {
        &self.black_pocket
    }

    // ========== Check Queries ==========

    #[inline]
    pub fn can_attack(&self, from: Square, to: Square) -> bool {
        self.board.can_attack(from, to)
    }

    #[inline]
    pub fn square_attacked(&self, sq: Square, by: Color) -> bool {
        self.board.square_attacked(sq, by)
    }

    #[inline]
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.board.find_king(color)
    }

    /// True if the king of `color` is attacked. A position without that
    /// king is reported as not in check.
    pub fn in_check(&self, color: Color) -> bool {
        if self.board.find_king(color).is_none() {
            warn!(?color, "no king on board; treating as not in check");
            return false;
        }
        self.board.in_check(color)
    }

    // ========== Legality ==========

    /// Explain why moving `from` -> `to` is illegal, or `Ok(())` if it is legal.
    pub fn check_move(&mut self, from: Square, to: Square) -> Result<(), RuleViolation> {
        let piece = self.board.get(from).ok_or(RuleViolation::NoPieceAtSource(from))?;
        if piece.color != self.turn {
            return Err(RuleViolation::NotYourTurn {
                to_move: self.turn,
                attempted: piece.color,
            });
        }
        if let Some(target) = self.board.get(to) {
            if target.color == piece.color {
                return Err(RuleViolation::OccupiedByOwnPiece(to));
            }
        }
        if !self.board.can_reach(from, to) {
            return Err(RuleViolation::IllegalGeometry { kind: piece.kind, from, to });
        }

        let exposed = self.board.speculate_move(from, to).in_check(piece.color);
        if exposed {
            return Err(RuleViolation::LeavesKingInCheck(piece.color));
        }
        Ok(())
    }

    /// Explain why dropping `piece` on `sq` is illegal, or `Ok(())` if it is
    /// legal. The piece's color is the dropping side.
    pub fn check_drop(&mut self, sq: Square, piece: Piece) -> Result<(), RuleViolation> {
        if !self.board.is_empty(sq) {
            return Err(RuleViolation::SquareOccupied(sq));
        }
        if piece.color != self.turn {
            return Err(RuleViolation::NotYourTurn {
                to_move: self.turn,
                attempted: piece.color,
            });
        }
        if piece.kind == PieceKind::Pawn && sq.is_back_rank() {
            return Err(RuleViolation::PawnOnBackRank(sq));
        }
        if !self.pocket(piece.color).contains(piece.kind) {
            return Err(RuleViolation::NotInPocket {
                kind: piece.kind,
                color: piece.color,
            });
        }

        let exposed = self.board.speculate_drop(sq, piece).in_check(piece.color);
        if exposed {
            return Err(RuleViolation::LeavesKingInCheck(piece.color));
        }
        Ok(())
    }

    /// True if the side to move may move the piece on `from` to `to`.
    ///
    /// Takes `&mut self` because the self-check filter edits the board
    /// temporarily; the board is always restored before returning.
    pub fn legal_move(&mut self, from: Square, to: Square) -> bool {
        self.check_move(from, to).is_ok()
    }

    /// True if `piece` may be dropped on `sq` by its color.
    pub fn legal_drop(&mut self, sq: Square, piece: Piece) -> bool {
        self.check_drop(sq, piece).is_ok()
    }

    // ========== Mutation ==========

    /// Apply a board move, or explain why it was refused.
    pub fn try_move(&mut self, from: Square, to: Square) -> Result<(), RuleViolation> {
        if let Err(violation) = self.check_move(from, to) {
            trace!(?from, ?to, %violation, "move rejected");
            return Err(violation);
        }

        let mover = self.turn;
        let Some(mut piece) = self.board.set(from, None) else {
            return Err(RuleViolation::NoPieceAtSource(from));
        };
        if let Some(captured) = self.board.get(to) {
            // Captured pieces change sides; kings are refused by the pocket.
            let converted = captured.inverted();
            self.pocket_mut(converted.color).add(converted.kind);
        }
        if piece.kind == PieceKind::Pawn && to.row() == mover.promotion_row() {
            piece = Piece::new(PieceKind::Queen, mover);
        }
        self.board.set(to, Some(piece));
        self.turn = mover.opponent();

        debug!(?from, ?to, piece = %piece, "move applied");
        Ok(())
    }

    /// Drop a piece, or explain why it was refused.
    pub fn try_drop(&mut self, sq: Square, piece: Piece) -> Result<(), RuleViolation> {
        if let Err(violation) = self.check_drop(sq, piece) {
            trace!(?sq, piece = %piece, %violation, "drop rejected");
            return Err(violation);
        }

        self.board.set(sq, Some(piece));
        self.pocket_mut(piece.color).take(piece.kind);
        self.turn = piece.color.opponent();

        debug!(?sq, piece = %piece, "drop applied");
        Ok(())
    }

    /// Move the piece on `from` to `to`. Returns false, changing nothing, if
    /// the move is illegal.
    pub fn apply_move(&mut self, from: Square, to: Square) -> bool {
        self.try_move(from, to).is_ok()
    }

    /// Drop a piece of `kind` for the side to move. Returns false, changing
    /// nothing, if the drop is illegal.
    pub fn apply_drop(&mut self, sq: Square, kind: PieceKind) -> bool {
        let piece = Piece::new(kind, self.turn);
        self.try_drop(sq, piece).is_ok()
    }

    /// Apply either kind of action.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Move { from, to } => self.apply_move(from, to),
            Action::Drop { kind, to } => self.apply_drop(to, kind),
        }
    }

    // ========== Enumeration ==========

    /// Squares the piece on `from` may legally move to.
    pub fn legal_moves_from(&mut self, from: Square) -> Vec<Square> {
        match self.board.get(from) {
            Some(piece) if piece.color == self.turn => {}
            _ => return Vec::new(),
        }
        Square::all().filter(|&to| self.legal_move(from, to)).collect()
    }

    /// All legal board moves for the side to move.
    pub fn legal_moves(&mut self) -> Vec<Action> {
        let turn = self.turn;
        let sources: Vec<Square> = self
            .board
            .pieces()
            .filter(|(_, p)| p.color == turn)
            .map(|(sq, _)| sq)
            .collect();

        let mut actions = Vec::with_capacity(64);
        for from in sources {
            for to in self.legal_moves_from(from) {
                actions.push(Action::Move { from, to });
            }
        }
        actions
    }

    /// All legal drops for the side to move, one per distinct pocket kind
    /// and target square.
    pub fn legal_drops(&mut self) -> Vec<Action> {
        let turn = self.turn;
        let kinds: Vec<PieceKind> = self.pocket(turn).counts().into_iter().map(|(k, _)| k).collect();

        let mut actions = Vec::new();
        for kind in kinds {
            let piece = Piece::new(kind, turn);
            for to in Square::all() {
                if self.legal_drop(to, piece) {
                    actions.push(Action::Drop { kind, to });
                }
            }
        }
        actions
    }

    /// Every legal move and drop for the side to move.
    pub fn legal_actions(&mut self) -> Vec<Action> {
        let mut actions = self.legal_moves();
        actions.extend(self.legal_drops());
        actions
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
