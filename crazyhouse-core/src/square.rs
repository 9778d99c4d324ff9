use serde::{Deserialize, Serialize};

use crate::error::BoardError;

/// A square on the 8x8 board.
///
/// Row 0 is Black's back rank and row 7 is White's, so the board reads top
/// to bottom as ranks 8 through 1:
/// ```text
///    col 0 ........ col 7
///   row 0   r n b q k b n r
///   row 1   p p p p p p p p
///   ...
///   row 6   P P P P P P P P
///   row 7   R N B Q K B N R
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct Square(u8);

impl Square {
    pub const SIZE: u8 = 8;

    /// Create a square, or `None` if either coordinate is off the board.
    #[inline]
    pub fn new(row: u8, col: u8) -> Option<Square> {
        if row < Self::SIZE && col < Self::SIZE {
            Some(Square(row * Self::SIZE + col))
        } else {
            None
        }
    }

    /// Create a square from coordinates already known to be in range.
    #[inline]
    pub fn from_row_col(row: u8, col: u8) -> Square {
        debug_assert!(row < Self::SIZE && col < Self::SIZE);
        Square(row * Self::SIZE + col)
    }

    #[inline]
    pub fn row(self) -> u8 {
        self.0 / Self::SIZE
    }

    #[inline]
    pub fn col(self) -> u8 {
        self.0 % Self::SIZE
    }

    /// Row-major index (0-63).
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The square `dr` rows and `dc` columns away, if still on the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row() as i8 + dr;
        let col = self.col() as i8 + dc;
        if (0..Self::SIZE as i8).contains(&row) && (0..Self::SIZE as i8).contains(&col) {
            Some(Square::from_row_col(row as u8, col as u8))
        } else {
            None
        }
    }

    /// True for row 0 and row 7.
    #[inline]
    pub fn is_back_rank(self) -> bool {
        self.row() == 0 || self.row() == Self::SIZE - 1
    }

    /// Iterate over all 64 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::SIZE * Self::SIZE).map(Square)
    }
}

impl TryFrom<(u8, u8)> for Square {
    type Error = BoardError;

    fn try_from((row, col): (u8, u8)) -> Result<Self, Self::Error> {
        Square::new(row, col).ok_or(BoardError::OutOfBounds { row, col })
    }
}

impl From<Square> for (u8, u8) {
    fn from(sq: Square) -> Self {
        (sq.row(), sq.col())
    }
}
