use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod game;
pub mod types;
pub mod wasm;

pub use board::Board;
pub use game::{GameSession, MinimaxSelector, MoveSelector, Phase};
pub use types::{GameState, Mark, Outcome, SessionConfig};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
