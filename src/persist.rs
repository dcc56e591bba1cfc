//! JSON game records. A record holds the whole board and the turn, so a
//! match can be resumed exactly where it stopped.

use crate::error::PersistError;
use crate::game::Game;

pub fn to_json(game: &Game) -> Result<String, PersistError> {
    Ok(serde_json::to_string(game)?)
}

pub fn to_json_pretty(game: &Game) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(game)?)
}

pub fn from_json(json: &str) -> Result<Game, PersistError> {
    Ok(serde_json::from_str(json)?)
}
