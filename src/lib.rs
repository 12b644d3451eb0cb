//! # Connect Four
//!
//! A two-player Connect Four game with an optional computer opponent on a
//! configurable grid (at least 7x6), played in a Ratatui terminal UI.
//!
//! The core is [`game::BoardEngine`]: it owns the grid, turn order, scoring,
//! and win detection, and emits events (`ChipPlaced`, `SwitchTurn`,
//! `GameOver`, `GameReset`, `NewGame`) that the presentation layer consumes.
//! The computer opponent plays a uniformly random legal column after a short
//! randomized thinking pause, committed through the same serialization point
//! as direct input.
//!
//! ## Modules
//!
//! - [`game`] — Board, win detection, the event-emitting engine
//! - [`config`] — Persisted user settings (TOML)
//! - [`ui`] — Terminal UI consuming the engine's events
//! - [`error`] — Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod ui;
