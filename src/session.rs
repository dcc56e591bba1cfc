//! The session side of a match: who may move, when a match ends, and
//! keeping concurrent requests for one match from interleaving.
//!
//! `Game` itself has no locking. Every match in a [`MatchTable`] sits behind
//! its own mutex and all reads and writes go through it, so one match only
//! ever has a single writer while different matches proceed in parallel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use log::{debug, info};

use crate::error::{MoveError, SessionError};
use crate::game::{Game, Turn};
use crate::moves::Move;
use crate::piece::Color;

pub type MatchId = u32;

/// What the opponent faces after a move went through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnReport {
    pub mover: Color,
    pub opponent: Color,
    pub in_check: bool,
    pub in_checkmate: bool,
    pub in_stalemate: bool,
    /// The session ended the match because of mate or stalemate.
    pub finished: bool,
}

/// Play `mv` on behalf of `side`, then evaluate the position for the other
/// side. A mated or stalemated opponent ends the match.
pub fn play_turn(game: &mut Game, side: Color, mv: &Move) -> Result<TurnReport, MoveError> {
    if game.is_finished() {
        return Err(MoveError::GameFinished);
    }
    if game.turn() != Turn::from(side) {
        return Err(MoveError::NotYourTurn {
            side,
            turn: game.turn(),
        });
    }
    game.make_move(mv)?;

    let opponent = side.opposite();
    let in_check = game.is_in_check(opponent);
    let in_checkmate = game.is_in_checkmate(opponent);
    let in_stalemate = game.is_in_stalemate(opponent);
    let finished = in_checkmate || in_stalemate;
    if finished {
        game.finish();
    }

    Ok(TurnReport {
        mover: side,
        opponent,
        in_check,
        in_checkmate,
        in_stalemate,
        finished,
    })
}

/// End the match on behalf of a player.
pub fn resign(game: &mut Game) -> Result<(), MoveError> {
    if game.is_finished() {
        return Err(MoveError::GameFinished);
    }
    game.finish();
    Ok(())
}

/// In-progress matches keyed by id.
#[derive(Debug, Default)]
pub struct MatchTable {
    next_id: AtomicU32,
    matches: RwLock<HashMap<MatchId, Arc<Mutex<Game>>>>,
}

impl MatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a match from the standard position.
    pub fn create(&self) -> MatchId {
        self.insert(Game::new())
    }

    /// Register an existing game, e.g. one loaded from a saved record.
    pub fn insert(&self, game: Game) -> MatchId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.matches
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(Mutex::new(game)));
        info!("match {id} opened");
        id
    }

    pub fn remove(&self, id: MatchId) -> Option<Game> {
        let slot = self
            .matches
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)?;
        let game = slot.lock().unwrap_or_else(PoisonError::into_inner).clone();
        info!("match {id} closed");
        Some(game)
    }

    pub fn len(&self) -> usize {
        self.matches.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, id: MatchId) -> Result<Arc<Mutex<Game>>, SessionError> {
        self.matches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(SessionError::UnknownMatch(id))
    }

    /// Run `f` with exclusive access to one match.
    pub fn with_game<R>(
        &self,
        id: MatchId,
        f: impl FnOnce(&mut Game) -> R,
    ) -> Result<R, SessionError> {
        let slot = self.slot(id)?;
        let mut game = slot.lock().map_err(|_| SessionError::PoisonedMatch(id))?;
        Ok(f(&mut game))
    }

    /// Copy of the current state, for broadcasting or saving.
    pub fn snapshot(&self, id: MatchId) -> Result<Game, SessionError> {
        self.with_game(id, |game| game.clone())
    }

    pub fn play(&self, id: MatchId, side: Color, mv: &Move) -> Result<TurnReport, SessionError> {
        let report = self.with_game(id, |game| play_turn(game, side, mv))??;
        debug!("match {id}: {side:?} played {mv}");
        if report.in_check {
            debug!("match {id}: {:?} is in check", report.opponent);
        }
        if report.finished {
            info!(
                "match {id} over: {:?} {}",
                report.opponent,
                if report.in_checkmate { "is checkmated" } else { "is stalemated" }
            );
        }
        Ok(report)
    }

    pub fn resign(&self, id: MatchId, side: Color) -> Result<(), SessionError> {
        self.with_game(id, resign)??;
        info!("match {id}: {side:?} resigned");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::Square;

    fn uci(s: &str) -> Move {
        Move::from_uci(s).unwrap()
    }

    #[test]
    fn play_turn_refuses_the_wrong_side() {
        let mut game = Game::new();
        let err = play_turn(&mut game, Color::Black, &uci("e7e5")).unwrap_err();
        assert_eq!(
            err,
            MoveError::NotYourTurn {
                side: Color::Black,
                turn: Turn::White
            }
        );
        assert_eq!(game, Game::new());
    }

    #[test]
    fn play_turn_refuses_moving_the_opponents_piece() {
        let mut game = Game::new();
        let err = play_turn(&mut game, Color::White, &uci("e7e5")).unwrap_err();
        assert!(matches!(err, MoveError::WrongTurn { .. }));
    }

    #[test]
    fn play_turn_reports_check() {
        let mut game = Game::new();
        play_turn(&mut game, Color::White, &uci("e2e4")).unwrap();
        play_turn(&mut game, Color::Black, &uci("f7f6")).unwrap();
        let report = play_turn(&mut game, Color::White, &uci("d1h5")).unwrap();
        assert_eq!(report.opponent, Color::Black);
        assert!(report.in_check);
        assert!(!report.in_checkmate);
        assert!(!report.finished);
        assert_eq!(game.turn(), Turn::Black);
    }

    #[test]
    fn mate_finishes_the_match() {
        let mut game = Game::new();
        for (side, m) in [
            (Color::White, "f2f3"),
            (Color::Black, "e7e5"),
            (Color::White, "g2g4"),
        ] {
            play_turn(&mut game, side, &uci(m)).unwrap();
        }
        let report = play_turn(&mut game, Color::Black, &uci("d8h4")).unwrap();
        assert!(report.in_check && report.in_checkmate && report.finished);
        assert!(game.is_finished());
        assert_eq!(
            play_turn(&mut game, Color::White, &uci("e1f2")),
            Err(MoveError::GameFinished)
        );
    }

    #[test]
    fn resign_only_once() {
        let mut game = Game::new();
        resign(&mut game).unwrap();
        assert!(game.is_finished());
        assert_eq!(resign(&mut game), Err(MoveError::GameFinished));
    }

    #[test]
    fn table_tracks_matches_independently() {
        let table = MatchTable::new();
        let a = table.create();
        let b = table.create();
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);

        table.play(a, Color::White, &uci("e2e4")).unwrap();
        assert_eq!(table.snapshot(a).unwrap().turn(), Turn::Black);
        assert_eq!(table.snapshot(b).unwrap(), Game::new());

        table.resign(b, Color::Black).unwrap();
        assert!(table.snapshot(b).unwrap().is_finished());
        assert_eq!(
            table.resign(b, Color::White),
            Err(SessionError::Move(MoveError::GameFinished))
        );

        let closed = table.remove(a).unwrap();
        assert!(closed.board().get_piece(Square::new(4, 5)).is_some());
        assert_eq!(table.snapshot(a), Err(SessionError::UnknownMatch(a)));
        assert!(table.remove(a).is_none());
    }

    #[test]
    fn unknown_match_is_an_error() {
        let table = MatchTable::new();
        assert!(table.is_empty());
        assert_eq!(
            table.play(7, Color::White, &uci("e2e4")),
            Err(SessionError::UnknownMatch(7))
        );
    }

    #[test]
    fn racing_moves_on_one_match_apply_once() {
        let table = MatchTable::new();
        let id = table.create();
        let results: Vec<Result<TurnReport, SessionError>> = std::thread::scope(|s| {
            let handles: Vec<_> = ["e2e4", "d2d4", "c2c4", "g1f3"]
                .into_iter()
                .map(|m| {
                    let table = &table;
                    s.spawn(move || table.play(id, Color::White, &uci(m)))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(matches!(
                err,
                SessionError::Move(MoveError::NotYourTurn { side: Color::White, .. })
            ));
        }
        let game = table.snapshot(id).unwrap();
        assert_eq!(game.turn(), Turn::Black);
        assert_eq!(game.board().pieces().count(), 32);
    }

    #[test]
    fn saved_game_can_be_resumed() {
        let table = MatchTable::new();
        let id = table.create();
        table.play(id, Color::White, &uci("g1f3")).unwrap();
        let record = crate::persist::to_json(&table.snapshot(id).unwrap()).unwrap();

        let resumed = table.insert(crate::persist::from_json(&record).unwrap());
        table.play(resumed, Color::Black, &uci("g8f6")).unwrap();
        assert_eq!(table.snapshot(resumed).unwrap().turn(), Turn::White);
    }
}
