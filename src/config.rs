use std::env;

/// Settings for the self-play driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelfPlayConfig {
    /// Stop after this many half-moves even if nobody is mated.
    pub max_plies: u32,
    /// Seed for move selection; `None` picks a fresh one each run.
    pub seed: Option<u64>,
    /// Log the board after every move.
    pub print_board: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            max_plies: 200,
            seed: None,
            print_board: false,
        }
    }
}

impl SelfPlayConfig {
    /// Defaults overridden by `CHESS_MAX_PLIES`, `CHESS_SEED` and
    /// `CHESS_PRINT_BOARD`. Values that fail to parse are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = SelfPlayConfig::default();
        if let Some(n) = lookup("CHESS_MAX_PLIES").and_then(|v| v.trim().parse().ok()) {
            config.max_plies = n;
        }
        if let Some(seed) = lookup("CHESS_SEED").and_then(|v| v.trim().parse().ok()) {
            config.seed = Some(seed);
        }
        if let Some(flag) = lookup("CHESS_PRINT_BOARD") {
            config.print_board = matches!(flag.trim(), "1" | "true" | "yes");
        }
        config
    }
}
