use crate::game::Game;
use crate::moves::Move;
use crate::piece::{Color, PieceType};
use crate::session::{self, TurnReport};
use crate::square::Square;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct SquarePiece {
    square: String,
    piece_type: Option<String>,
    color: Option<String>,
}

#[derive(Serialize)]
struct MoveJson {
    from: String,
    to: String,
    promotion: Option<String>,
}

#[derive(Serialize)]
struct BoardState {
    squares: Vec<SquarePiece>,
    turn: String,
    in_check: bool,
}

#[derive(Serialize)]
struct MoveResult {
    #[serde(flatten)]
    board_state: Option<BoardState>,
    in_checkmate: bool,
    in_stalemate: bool,
    error: Option<String>,
}

impl MoveResult {
    fn refused(error: String) -> Self {
        MoveResult {
            board_state: None,
            in_checkmate: false,
            in_stalemate: false,
            error: Some(error),
        }
    }
}

fn piece_type_to_string(pt: PieceType) -> String {
    format!("{pt:?}")
}

fn color_to_string(c: Color) -> String {
    format!("{c:?}")
}

fn string_to_color(s: &str) -> Option<Color> {
    match s {
        "White" => Some(Color::White),
        "Black" => Some(Color::Black),
        _ => None,
    }
}

fn move_json(m: &Move) -> MoveJson {
    MoveJson {
        from: m.from.to_string(),
        to: m.to.to_string(),
        promotion: m.promotion.map(piece_type_to_string),
    }
}

fn build_board_state(game: &Game, perspective: Color) -> BoardState {
    let squares = game
        .board()
        .squares_from(perspective)
        .into_iter()
        .map(|(sq, piece)| SquarePiece {
            square: sq.to_string(),
            piece_type: piece.map(|p| piece_type_to_string(p.piece_type)),
            color: piece.map(|p| color_to_string(p.color)),
        })
        .collect();

    BoardState {
        squares,
        turn: format!("{:?}", game.turn()),
        in_check: game.turn().side().map_or(false, |side| game.is_in_check(side)),
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

/// Browser handle on one match. The page owns the only reference, so there
/// is a single writer by construction.
#[wasm_bindgen]
pub struct GameHandle {
    game: Game,
    perspective: Color,
}

#[wasm_bindgen]
impl GameHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> GameHandle {
        GameHandle {
            game: Game::new(),
            perspective: Color::White,
        }
    }

    /// Restore a match from a saved JSON record.
    pub fn load(json: &str) -> Result<GameHandle, JsValue> {
        let game = crate::persist::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(GameHandle {
            game,
            perspective: Color::White,
        })
    }

    pub fn save(&self) -> Result<String, JsValue> {
        crate::persist::to_json(&self.game).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn build_timestamp() -> String {
        env!("BUILD_TIMESTAMP").to_string()
    }

    pub fn set_perspective(&mut self, color: &str) {
        if let Some(c) = string_to_color(color) {
            self.perspective = c;
        }
    }

    pub fn get_board_state(&self) -> JsValue {
        to_js(&build_board_state(&self.game, self.perspective))
    }

    pub fn make_move(&mut self, side: &str, uci: &str) -> JsValue {
        let outcome = string_to_color(side)
            .ok_or_else(|| format!("unknown side '{side}'"))
            .and_then(|side| {
                let mv = Move::from_uci(uci).map_err(|e| e.to_string())?;
                session::play_turn(&mut self.game, side, &mv).map_err(|e| e.to_string())
            });

        let result = match outcome {
            Ok(TurnReport {
                in_checkmate,
                in_stalemate,
                ..
            }) => MoveResult {
                board_state: Some(build_board_state(&self.game, self.perspective)),
                in_checkmate,
                in_stalemate,
                error: None,
            },
            Err(error) => MoveResult::refused(error),
        };
        to_js(&result)
    }

    /// Play a uniformly random legal move for the side to move, as a
    /// stand-in opponent.
    pub fn make_random_move(&mut self) -> JsValue {
        let Some(side) = self.game.turn().side() else {
            return to_js(&MoveResult::refused("game is already over".to_string()));
        };
        let mut moves: Vec<Move> = self.game.legal_moves(side).into_iter().collect();
        if moves.is_empty() {
            return to_js(&MoveResult::refused(format!("{side:?} has no legal moves")));
        }
        moves.sort();
        let index = (js_sys::Math::random() * moves.len() as f64) as usize;
        let mv = moves[index.min(moves.len() - 1)];
        self.make_move(&color_to_string(side), &mv.to_uci())
    }

    pub fn resign(&mut self) -> JsValue {
        match session::resign(&mut self.game) {
            Ok(()) => JsValue::NULL,
            Err(e) => JsValue::from_str(&e.to_string()),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.game.is_finished()
    }

    /// Destinations to highlight for the piece on `square`.
    pub fn get_legal_moves_for_square(&self, square: &str) -> JsValue {
        let Ok(at) = square.parse::<Square>() else {
            return JsValue::NULL;
        };
        match self.game.valid_moves(at) {
            Some(moves) => {
                let mut moves: Vec<Move> = moves.into_iter().collect();
                moves.sort();
                to_js(&moves.iter().map(move_json).collect::<Vec<_>>())
            }
            None => JsValue::NULL,
        }
    }
}
