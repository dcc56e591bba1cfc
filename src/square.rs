use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NotationError;

/// A board coordinate. Both `row` and `col` are 1-based; row 1 is White's
/// back rank and column 1 is the a-file.
///
/// No range check happens on construction. Indexing a `Board` with a square
/// outside 1..=8 panics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub row: i32,
    pub col: i32,
}

impl Square {
    pub const fn new(row: i32, col: i32) -> Self {
        Square { row, col }
    }

    pub fn in_bounds(&self) -> bool {
        (1..=8).contains(&self.row) && (1..=8).contains(&self.col)
    }

    /// The square `(dr, dc)` away, if it is still on the board.
    pub fn offset(&self, dr: i32, dc: i32) -> Option<Square> {
        let sq = Square::new(self.row + dr, self.col + dc);
        sq.in_bounds().then_some(sq)
    }

    /// Zero-based `(row, col)` index into the board grid.
    pub(crate) fn index(&self) -> (usize, usize) {
        ((self.row - 1) as usize, (self.col - 1) as usize)
    }

    /// All 64 squares, row 1 first, columns left to right.
    pub fn all() -> impl Iterator<Item = Square> {
        (1..=8).flat_map(|row| (1..=8).map(move |col| Square::new(row, col)))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.in_bounds() {
            return write!(f, "({},{})", self.row, self.col);
        }
        let file = (b'a' + (self.col - 1) as u8) as char;
        let rank = (b'1' + (self.row - 1) as u8) as char;
        write!(f, "{file}{rank}")
    }
}

impl FromStr for Square {
    type Err = NotationError;

    /// Parse algebraic notation such as `"e2"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(NotationError::Square(s.to_string()));
        }
        let (file, rank) = (bytes[0].to_ascii_lowercase(), bytes[1]);
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(NotationError::Square(s.to_string()));
        }
        Ok(Square::new((rank - b'0') as i32, (file - b'a') as i32 + 1))
    }
}
