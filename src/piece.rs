use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::movegen;
use crate::moves::Move;
use crate::square::Square;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row offset of a forward pawn step.
    pub fn forward(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Row the pawns of this color start on.
    pub fn pawn_row(self) -> i32 {
        match self {
            Color::White => 2,
            Color::Black => 7,
        }
    }

    /// Row a pawn of this color promotes on.
    pub fn promotion_row(self) -> i32 {
        match self {
            Color::White => 8,
            Color::Black => 1,
        }
    }

    pub fn back_row(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => 8,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceType {
    /// Kinds a pawn may promote to, in the order they are generated.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Rook,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Queen,
    ];

    /// Lowercase letter used by UCI and the text board.
    pub fn letter(self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Rook => 'r',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    pub fn from_letter(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'r' => Some(PieceType::Rook),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color) -> Self {
        Piece { piece_type, color }
    }

    /// Pseudo-legal moves for this piece standing on `at`. Moves that leave
    /// the mover's own king in check are included.
    pub fn moves(&self, board: &Board, at: Square) -> HashSet<Move> {
        movegen::piece_moves(board, at, *self)
    }

    /// Text board character: uppercase for White, lowercase for Black.
    pub fn symbol(&self) -> char {
        let c = self.piece_type.letter();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}
