//! The 8x8 grid and everything that can be answered from the grid alone:
//! attack geometry, path blocking, and check detection.
//!
//! Check detection is a plain scan over all 64 squares per query. Nothing
//! here knows whose turn it is.

use std::ops::Deref;

use serde::Serialize;
use tracing::debug;

use crate::error::BoardError;
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

/// Back rank order from column 0 to column 7.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Piece placement, one optional piece per square, row-major.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(transparent)]
pub struct Board {
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Board {
        Board { squares: vec![None; 64] }
    }

    /// The standard chess starting array.
    pub fn standard() -> Board {
        let mut board = Board::empty();
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            let col = col as u8;
            board.set(Square::from_row_col(0, col), Some(Piece::new(kind, Color::Black)));
            board.set(Square::from_row_col(1, col), Some(Piece::new(PieceKind::Pawn, Color::Black)));
            board.set(Square::from_row_col(6, col), Some(Piece::new(PieceKind::Pawn, Color::White)));
            board.set(Square::from_row_col(7, col), Some(Piece::new(kind, Color::White)));
        }
        board
    }

    /// Build a board from eight rows of tokens, row 0 first.
    ///
    /// Each row holds eight characters: a piece token (`K Q R B N P`, case is
    /// color) or `.` for an empty square. Spaces are ignored.
    pub fn from_ranks(rows: [&str; 8]) -> Result<Board, BoardError> {
        let mut board = Board::empty();
        for (row, text) in rows.iter().enumerate() {
            let row = row as u8;
            let tokens: Vec<char> = text.chars().filter(|c| *c != ' ').collect();
            if tokens.len() != 8 {
                return Err(BoardError::BadRowLength { row, len: tokens.len() });
            }
            for (col, &token) in tokens.iter().enumerate() {
                let col = col as u8;
                if token == '.' {
                    continue;
                }
                let piece = Piece::from_char(token).ok_or(BoardError::InvalidToken { token, row, col })?;
                board.set(Square::from_row_col(row, col), Some(piece));
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    /// Put `piece` on `sq` (or clear it with `None`), returning what was there.
    /// Does NOT validate - caller must ensure the placement is legal.
    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.squares[sq.index()], piece)
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Occupied squares with their pieces, row-major.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    // ========== Attack Geometry ==========

    /// True if no square strictly between `from` and `to` is occupied.
    ///
    /// Steps by the sign of the row and column deltas, so the two squares
    /// must already be on a shared rank, file, or diagonal.
    pub fn path_clear(&self, from: Square, to: Square) -> bool {
        let dr = (to.row() as i8 - from.row() as i8).signum();
        let dc = (to.col() as i8 - from.col() as i8).signum();
        let mut current = from;
        loop {
            current = match current.offset(dr, dc) {
                Some(next) => next,
                None => return false,
            };
            if current == to {
                return true;
            }
            if !self.is_empty(current) {
                return false;
            }
        }
    }

    fn diagonal_path(&self, from: Square, to: Square) -> bool {
        let dr = (to.row() as i8 - from.row() as i8).abs();
        let dc = (to.col() as i8 - from.col() as i8).abs();
        dr == dc && dr != 0 && self.path_clear(from, to)
    }

    fn straight_path(&self, from: Square, to: Square) -> bool {
        from != to && (from.row() == to.row() || from.col() == to.col()) && self.path_clear(from, to)
    }

    /// True if the piece on `from` threatens `to`.
    ///
    /// Attack semantics: whose turn it is and what stands on `to` are both
    /// ignored. Pawns threaten only their two forward diagonals.
    pub fn can_attack(&self, from: Square, to: Square) -> bool {
        let Some(piece) = self.get(from) else {
            return false;
        };
        if from == to {
            return false;
        }
        let dr = to.row() as i8 - from.row() as i8;
        let dc = to.col() as i8 - from.col() as i8;

        match piece.kind {
            PieceKind::Pawn => dc.abs() == 1 && dr == piece.color.forward(),
            PieceKind::Knight => KNIGHT_OFFSETS.contains(&(dr, dc)),
            PieceKind::Bishop => self.diagonal_path(from, to),
            PieceKind::Rook => self.straight_path(from, to),
            PieceKind::Queen => self.diagonal_path(from, to) || self.straight_path(from, to),
            PieceKind::King => dr.abs() <= 1 && dc.abs() <= 1,
        }
    }

    /// Movement geometry for the piece on `from`, which differs from attack
    /// geometry only for pawns: they push straight ahead onto empty squares
    /// (two from their home row) and step diagonally only to capture.
    ///
    /// Ownership of `to` is not checked here.
    pub fn can_reach(&self, from: Square, to: Square) -> bool {
        let Some(piece) = self.get(from) else {
            return false;
        };
        if piece.kind != PieceKind::Pawn {
            return self.can_attack(from, to);
        }

        let forward = piece.color.forward();
        let dr = to.row() as i8 - from.row() as i8;
        let target_empty = self.is_empty(to);

        if from.col() == to.col() {
            if dr == forward {
                target_empty
            } else if dr == 2 * forward {
                from.row() == piece.color.pawn_home_row() && target_empty && self.path_clear(from, to)
            } else {
                false
            }
        } else {
            !target_empty && self.can_attack(from, to)
        }
    }

    /// True if any piece of `by` attacks `sq`.
    pub fn square_attacked(&self, sq: Square, by: Color) -> bool {
        self.pieces()
            .any(|(from, piece)| piece.color == by && self.can_attack(from, sq))
    }

    /// Location of the first king of `color` in row-major order.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        let king = Piece::new(PieceKind::King, color);
        self.pieces().find(|&(_, p)| p == king).map(|(sq, _)| sq)
    }

    /// True if the king of `color` is attacked. A board without that king is
    /// reported as not in check.
    pub fn in_check(&self, color: Color) -> bool {
        match self.find_king(color) {
            Some(king) => self.square_attacked(king, color.opponent()),
            None => {
                debug!(?color, "no king on board; treating as not in check");
                false
            }
        }
    }

    // ========== Speculation ==========

    /// Tentatively relocate the piece on `from` to `to`. The board is
    /// restored when the returned guard is dropped.
    pub(crate) fn speculate_move(&mut self, from: Square, to: Square) -> Speculation<'_> {
        let moving = self.set(from, None);
        let captured = self.set(to, moving);
        Speculation {
            board: self,
            saved: [Some((to, captured)), Some((from, moving))],
        }
    }

    /// Tentatively place `piece` on `sq`, restored when the guard drops.
    pub(crate) fn speculate_drop(&mut self, sq: Square, piece: Piece) -> Speculation<'_> {
        let previous = self.set(sq, Some(piece));
        Speculation {
            board: self,
            saved: [Some((sq, previous)), None],
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..Square::SIZE {
            for col in 0..Square::SIZE {
                match self.get(Square::from_row_col(row, col)) {
                    Some(piece) => write!(f, "{}", piece)?,
                    None => write!(f, ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A temporary board edit that is undone on every exit path.
///
/// Derefs to the edited board so check queries can run against it.
pub(crate) struct Speculation<'a> {
    board: &'a mut Board,
    saved: [Option<(Square, Option<Piece>)>; 2],
}

impl Deref for Speculation<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl Drop for Speculation<'_> {
    fn drop(&mut self) {
        for (sq, piece) in self.saved.iter().flatten() {
            self.board.set(*sq, *piece);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, col: u8) -> Square {
        Square::from_row_col(row, col)
    }

    fn board(rows: [&str; 8]) -> Board {
        Board::from_ranks(rows).unwrap()
    }

    #[test]
    fn test_standard_layout() {
        let b = Board::standard();
        assert_eq!(
            b.to_string(),
            "rnbqkbnr\npppppppp\n........\n........\n........\n........\nPPPPPPPP\nRNBQKBNR\n"
        );
        assert_eq!(b.pieces().count(), 32);
        assert_eq!(b.find_king(Color::White), Some(sq(7, 4)));
        assert_eq!(b.find_king(Color::Black), Some(sq(0, 4)));
    }

    #[test]
    fn test_from_ranks_errors() {
        assert_eq!(Board::from_ranks(["........"; 8]), Ok(Board::empty()));

        let mut rows = ["........"; 8];
        rows[3] = "...x....";
        assert_eq!(
            Board::from_ranks(rows),
            Err(BoardError::InvalidToken { token: 'x', row: 3, col: 3 })
        );

        rows[3] = ".......";
        assert_eq!(Board::from_ranks(rows), Err(BoardError::BadRowLength { row: 3, len: 7 }));
    }

    #[test]
    fn test_from_ranks_ignores_spaces() {
        let mut rows = ["........"; 8];
        rows[0] = "r . . . k . . .";
        let b = Board::from_ranks(rows).unwrap();
        assert_eq!(b.get(sq(0, 0)), Piece::from_char('r'));
        assert_eq!(b.get(sq(0, 4)), Piece::from_char('k'));
    }

    #[test]
    fn test_path_clear() {
        let b = board([
            "........",
            "........",
            "........",
            "...p....",
            "........",
            "........",
            "........",
            "R.......",
        ]);
        // Rook on (7,0) up the file: clear
        assert!(b.path_clear(sq(7, 0), sq(0, 0)));
        // Diagonal through (3,3) is blocked
        assert!(!b.path_clear(sq(7, 7), sq(0, 0)));
        // Endpoints are excluded
        assert!(b.path_clear(sq(4, 4), sq(3, 3)));
        assert!(b.path_clear(sq(3, 3), sq(0, 0)));
    }

    #[test]
    fn test_pawn_attacks_forward_diagonals_only() {
        let b = board([
            "........",
            "........",
            "........",
            "........",
            "....P...",
            "........",
            "........",
            "........",
        ]);
        let p = sq(4, 4);
        assert!(b.can_attack(p, sq(3, 3)));
        assert!(b.can_attack(p, sq(3, 5)));
        // Not straight ahead, not backwards
        assert!(!b.can_attack(p, sq(3, 4)));
        assert!(!b.can_attack(p, sq(5, 3)));
        assert!(!b.can_attack(p, sq(5, 5)));

        let b = board([
            "........",
            "........",
            "........",
            "....p...",
            "........",
            "........",
            "........",
            "........",
        ]);
        assert!(b.can_attack(sq(3, 4), sq(4, 3)));
        assert!(b.can_attack(sq(3, 4), sq(4, 5)));
        assert!(!b.can_attack(sq(3, 4), sq(2, 3)));
    }

    #[test]
    fn test_knight_attacks() {
        let b = board([
            "........",
            "........",
            "........",
            "...N....",
            "........",
            "........",
            "........",
            "........",
        ]);
        let n = sq(3, 3);
        let attacked: Vec<Square> = Square::all().filter(|&t| b.can_attack(n, t)).collect();
        assert_eq!(attacked.len(), 8);
        assert!(attacked.contains(&sq(1, 2)));
        assert!(attacked.contains(&sq(5, 4)));
        assert!(!attacked.contains(&sq(4, 4)));
    }

    #[test]
    fn test_sliders_blocked() {
        let b = board([
            "........",
            "........",
            "........",
            "...Q.p..",
            "........",
            ".b......",
            "........",
            "........",
        ]);
        let q = sq(3, 3);
        // Along the rank up to and including the blocker
        assert!(b.can_attack(q, sq(3, 4)));
        assert!(b.can_attack(q, sq(3, 5)));
        assert!(!b.can_attack(q, sq(3, 6)));
        // Diagonal toward (5,1) stops at the bishop
        assert!(b.can_attack(q, sq(5, 1)));
        assert!(!b.can_attack(q, sq(6, 0)));
        // Not aligned
        assert!(!b.can_attack(q, sq(5, 4)));
    }

    #[test]
    fn test_king_adjacent() {
        let b = board([
            "........",
            "........",
            "........",
            "........",
            "....K...",
            "........",
            "........",
            "........",
        ]);
        let k = sq(4, 4);
        assert_eq!(Square::all().filter(|&t| b.can_attack(k, t)).count(), 8);
        assert!(!b.can_attack(k, k));
        assert!(!b.can_attack(k, sq(2, 4)));
    }

    #[test]
    fn test_pawn_reach() {
        let b = Board::standard();
        assert!(b.can_reach(sq(6, 4), sq(5, 4)));
        assert!(b.can_reach(sq(6, 4), sq(4, 4)));
        assert!(!b.can_reach(sq(6, 4), sq(3, 4)));
        assert!(!b.can_reach(sq(6, 4), sq(5, 3)));
        assert!(b.can_reach(sq(1, 2), sq(3, 2)));

        let b = board([
            "........",
            "........",
            "........",
            "........",
            "........",
            "....n...",
            "....P...",
            "........",
        ]);
        // Blocked straight ahead, so neither single nor double push
        assert!(!b.can_reach(sq(6, 4), sq(5, 4)));
        assert!(!b.can_reach(sq(6, 4), sq(4, 4)));
    }

    #[test]
    fn test_in_check() {
        let b = board([
            "....k...",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            "....R..K",
        ]);
        assert!(b.in_check(Color::Black));
        assert!(!b.in_check(Color::White));
        assert!(b.square_attacked(sq(3, 4), Color::White));
        assert!(!b.square_attacked(sq(3, 3), Color::White));
    }

    #[test]
    fn test_missing_king_not_in_check() {
        let b = Board::empty();
        assert_eq!(b.find_king(Color::White), None);
        assert!(!b.in_check(Color::White));
    }

    #[test]
    fn test_speculation_restores() {
        let mut b = Board::standard();
        let before = b.clone();
        {
            let spec = b.speculate_move(sq(7, 6), sq(5, 5));
            assert_eq!(spec.get(sq(7, 6)), None);
            assert_eq!(spec.get(sq(5, 5)), Piece::from_char('N'));
        }
        assert_eq!(b, before);

        {
            let spec = b.speculate_drop(sq(4, 4), Piece::new(PieceKind::Queen, Color::Black));
            assert!(!spec.in_check(Color::White));
        }
        assert_eq!(b, before);
    }

    #[test]
    fn test_speculation_restores_capture() {
        let mut b = board([
            "....k...",
            "........",
            "........",
            "...p....",
            "....P...",
            "........",
            "........",
            "....K...",
        ]);
        let before = b.clone();
        {
            let spec = b.speculate_move(sq(4, 4), sq(3, 3));
            assert_eq!(spec.get(sq(3, 3)), Piece::from_char('P'));
        }
        assert_eq!(b, before);
    }
}
