//! Core game logic: chips, the gravity-bound grid with win detection, and
//! the event-emitting board engine with its computer opponent.

mod board;
mod chip;
mod engine;
mod events;

pub use board::{Board, WinResult, MIN_COLS, MIN_ROWS};
pub use chip::{Chip, GameStatus};
pub use engine::BoardEngine;
pub use events::{GameEvent, Listener};
