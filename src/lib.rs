pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod persist;
pub mod piece;
pub mod session;
pub mod square;

#[cfg(target_arch = "wasm32")]
mod wasm_api;
