use thiserror::Error;

use crate::game::Turn;
use crate::moves::Move;
use crate::piece::Color;
use crate::session::MatchId;
use crate::square::Square;

/// Why a move was refused. A refused move never touches the game.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece on {0}")]
    NoPiece(Square),

    #[error("piece on {square} is {piece_color:?} but it is {turn:?}'s turn")]
    WrongTurn {
        square: Square,
        piece_color: Color,
        turn: Turn,
    },

    #[error("{0} is not a legal move")]
    IllegalMove(Move),

    #[error("game is already over")]
    GameFinished,

    #[error("{side:?} cannot move while it is {turn:?}'s turn")]
    NotYourTurn { side: Color, turn: Turn },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("invalid square '{0}'")]
    Square(String),

    #[error("invalid move '{0}'")]
    Move(String),

    #[error("invalid promotion piece '{0}'")]
    Promotion(char),
}

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("malformed game record: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no match with id {0}")]
    UnknownMatch(MatchId),

    #[error("match {0} was left in an inconsistent state by a panicking writer")]
    PoisonedMatch(MatchId),

    #[error(transparent)]
    Move(#[from] MoveError),
}
