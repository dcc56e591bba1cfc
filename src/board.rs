use std::fmt;

use serde::{Deserialize, Serialize};

use crate::piece::{Color, Piece, PieceType};
use crate::square::Square;

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// An 8x8 grid of optional pieces. `squares[0]` is row 1.
///
/// Nothing limits how many kings (or anything else) a board holds; legality
/// simulation relies on being able to build arbitrary positions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// A board in the standard starting position.
    pub fn new() -> Self {
        let mut board = Board::empty();
        board.reset_board();
        board
    }

    /// Put `piece` on `at`, replacing whatever was there. The board stores
    /// its own instance built from the piece's color and type.
    pub fn add_piece(&mut self, at: Square, piece: Piece) {
        let (r, c) = at.index();
        self.squares[r][c] = Some(Piece::new(piece.piece_type, piece.color));
    }

    pub fn get_piece(&self, at: Square) -> Option<Piece> {
        let (r, c) = at.index();
        self.squares[r][c]
    }

    pub fn remove_piece(&mut self, at: Square) -> Option<Piece> {
        let (r, c) = at.index();
        self.squares[r][c].take()
    }

    /// Clear the board and set up the standard 32 pieces.
    pub fn reset_board(&mut self) {
        self.squares = [[None; 8]; 8];
        for color in [Color::White, Color::Black] {
            let back = color.back_row();
            let pawns = color.pawn_row();
            for (i, pt) in BACK_RANK.iter().enumerate() {
                let col = i as i32 + 1;
                self.add_piece(Square::new(back, col), Piece::new(*pt, color));
                self.add_piece(Square::new(pawns, col), Piece::new(PieceType::Pawn, color));
            }
        }
    }

    /// Move whatever stands on `from` to `to`, leaving `from` empty. Anything
    /// on `to` is overwritten. With a `promotion` the moved piece becomes
    /// that type and keeps its color.
    ///
    /// An empty `from` simply clears `to`.
    pub fn replace_piece(&mut self, from: Square, to: Square, promotion: Option<PieceType>) {
        let moving = self.remove_piece(from).map(|p| match promotion {
            Some(pt) => Piece::new(pt, p.color),
            None => p,
        });
        let (r, c) = to.index();
        self.squares[r][c] = moving;
    }

    /// Independent copy for what-if simulation.
    pub fn copy(&self) -> Board {
        self.clone()
    }

    /// Every occupied square with its piece, row 1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get_piece(sq).map(|p| (sq, p)))
    }

    /// Occupied squares holding a piece of `color`.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    /// All 64 squares in drawing order for a player sitting on
    /// `perspective`'s side: top-left first, reading row by row.
    pub fn squares_from(&self, perspective: Color) -> Vec<(Square, Option<Piece>)> {
        let (rows, cols): (Vec<i32>, Vec<i32>) = match perspective {
            Color::White => ((1..=8).rev().collect(), (1..=8).collect()),
            Color::Black => ((1..=8).collect(), (1..=8).rev().collect()),
        };
        rows.iter()
            .flat_map(|&row| cols.iter().map(move |&col| Square::new(row, col)))
            .map(|sq| (sq, self.get_piece(sq)))
            .collect()
    }
}

impl fmt::Display for Board {
    /// Row 8 at the top. Uppercase is White, lowercase Black, '.' empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..8).rev() {
            let line: String = self.squares[row]
                .iter()
                .map(|sq| sq.map(|p| p.symbol()).unwrap_or('.'))
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
