use chess_rules::config::SelfPlayConfig;
use chess_rules::moves::Move;
use chess_rules::session::MatchTable;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SelfPlayConfig::from_env();
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);
    log::info!(
        "selfplay built {} (seed {seed}, max {} plies)",
        env!("BUILD_TIMESTAMP"),
        config.max_plies
    );

    let table = MatchTable::new();
    let id = table.create();
    let mut plies = 0;

    while plies < config.max_plies {
        let game = match table.snapshot(id) {
            Ok(game) => game,
            Err(e) => {
                log::error!("{e}");
                return;
            }
        };
        let Some(side) = game.turn().side() else {
            break;
        };

        // Sorted so a given seed always replays the same game.
        let mut moves: Vec<Move> = game.legal_moves(side).into_iter().collect();
        moves.sort();
        let Some(mv) = moves.choose(&mut rng).copied() else {
            break;
        };

        match table.play(id, side, &mv) {
            Ok(_) => plies += 1,
            Err(e) => {
                log::error!("engine refused its own legal move {mv}: {e}");
                return;
            }
        }
        if config.print_board {
            if let Ok(game) = table.snapshot(id) {
                log::info!("after {mv}:\n{}", game.board());
            }
        }
    }

    match table.remove(id) {
        Some(game) => {
            let status = if game.is_finished() { "finished" } else { "move limit reached" };
            eprintln!("Game over after {plies} plies ({status})\n{}", game.board());
        }
        None => log::error!("match {id} vanished"),
    }
}
