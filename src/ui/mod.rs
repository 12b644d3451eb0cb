//! Terminal UI: event-driven game view over the board engine.

mod app;
mod game_view;

pub use app::App;
