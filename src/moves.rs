use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NotationError;
use crate::piece::PieceType;
use crate::square::Square;

/// Equality covers all three fields. Legality checks look a candidate up in
/// the set of legal moves, so a promotion move only matches when the
/// promotion kind matches too.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub fn new(from: Square, to: Square, promotion: Option<PieceType>) -> Self {
        Move { from, to, promotion }
    }

    /// Convert to UCI notation, e.g. "e2e4", "a7a8q"
    pub fn to_uci(&self) -> String {
        let promo = self.promotion.map(|pt| pt.letter().to_string()).unwrap_or_default();
        format!("{}{}{promo}", self.from, self.to)
    }

    /// Parse from UCI notation
    pub fn from_uci(s: &str) -> Result<Move, NotationError> {
        let s = s.trim();
        if !(4..=5).contains(&s.len()) || !s.is_ascii() {
            return Err(NotationError::Move(s.to_string()));
        }
        let from: Square = s[0..2].parse()?;
        let to: Square = s[2..4].parse()?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match PieceType::from_letter(c) {
                Some(pt) if PieceType::PROMOTIONS.contains(&pt) => Some(pt),
                _ => return Err(NotationError::Promotion(c)),
            },
        };
        Ok(Move { from, to, promotion })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}
