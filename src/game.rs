use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::MoveError;
use crate::moves::Move;
use crate::piece::{Color, PieceType};
use crate::square::Square;

/// Whose move it is. `Finished` is only ever set from outside the engine,
/// e.g. on resignation or once the session layer sees a mate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    White,
    Black,
    Finished,
}

impl Turn {
    pub fn side(self) -> Option<Color> {
        match self {
            Turn::White => Some(Color::White),
            Turn::Black => Some(Color::Black),
            Turn::Finished => None,
        }
    }
}

impl From<Color> for Turn {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Turn::White,
            Color::Black => Turn::Black,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    turn: Turn,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Standard starting position, White to move.
    pub fn new() -> Self {
        Game {
            board: Board::new(),
            turn: Turn::White,
        }
    }

    pub fn with_board(board: Board, turn: Turn) -> Self {
        Game { board, turn }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn set_turn(&mut self, turn: Turn) {
        self.turn = turn;
    }

    pub fn is_finished(&self) -> bool {
        self.turn == Turn::Finished
    }

    pub fn finish(&mut self) {
        self.turn = Turn::Finished;
    }

    /// Legal moves for the piece on `at`, or `None` when the square is empty.
    ///
    /// The check test uses the moving piece's own color rather than the side
    /// to move, so this answers what-if questions for either side.
    pub fn valid_moves(&self, at: Square) -> Option<HashSet<Move>> {
        let piece = self.board.get_piece(at)?;
        let moves = piece
            .moves(&self.board, at)
            .into_iter()
            .filter(|mv| !leaves_in_check(&self.board, mv, piece.color))
            .collect();
        Some(moves)
    }

    /// Every legal move available to `color`.
    pub fn legal_moves(&self, color: Color) -> HashSet<Move> {
        self.board
            .pieces_of(color)
            .filter_map(|(sq, _)| self.valid_moves(sq))
            .flatten()
            .collect()
    }

    /// True when any piece of the other color could capture `color`'s king
    /// with a pseudo-legal move.
    pub fn is_in_check(&self, color: Color) -> bool {
        in_check(&self.board, color)
    }

    /// True when none of `color`'s pseudo-legal moves gets it out of check.
    ///
    /// This does not require `color` to be in check first: a side with no
    /// moves at all counts as mated.
    pub fn is_in_checkmate(&self, color: Color) -> bool {
        let candidates: HashSet<Move> = self
            .board
            .pieces_of(color)
            .flat_map(|(sq, piece)| piece.moves(&self.board, sq))
            .collect();
        candidates
            .iter()
            .all(|mv| leaves_in_check(&self.board, mv, color))
    }

    /// True when no piece of `color` has a legal move.
    pub fn is_in_stalemate(&self, color: Color) -> bool {
        self.board
            .pieces_of(color)
            .all(|(sq, _)| self.valid_moves(sq).map_or(true, |moves| moves.is_empty()))
    }

    /// Apply `mv` for the side to move and pass the turn. A refused move
    /// leaves the game untouched.
    pub fn make_move(&mut self, mv: &Move) -> Result<(), MoveError> {
        let piece = self
            .board
            .get_piece(mv.from)
            .ok_or(MoveError::NoPiece(mv.from))?;
        let side = self.turn.side().ok_or(MoveError::GameFinished)?;
        if piece.color != side {
            return Err(MoveError::WrongTurn {
                square: mv.from,
                piece_color: piece.color,
                turn: self.turn,
            });
        }
        let legal = self.valid_moves(mv.from).unwrap_or_default();
        if !legal.contains(mv) {
            return Err(MoveError::IllegalMove(*mv));
        }

        self.board.replace_piece(mv.from, mv.to, mv.promotion);
        self.turn = side.opposite().into();
        log::trace!("{:?} played {mv}", side);
        Ok(())
    }
}

fn in_check(board: &Board, color: Color) -> bool {
    board.pieces_of(color.opposite()).any(|(sq, attacker)| {
        attacker.moves(board, sq).iter().any(|mv| {
            board
                .get_piece(mv.to)
                .map(|p| p.piece_type == PieceType::King && p.color == color)
                .unwrap_or(false)
        })
    })
}

/// Play `mv` on a scratch copy and see whether `color` is left in check.
fn leaves_in_check(board: &Board, mv: &Move, color: Color) -> bool {
    let mut scratch = board.copy();
    scratch.replace_piece(mv.from, mv.to, mv.promotion);
    in_check(&scratch, color)
}
