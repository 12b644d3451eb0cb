use super::chip::GameStatus;

/// State-change notifications emitted by the engine.
///
/// Events fire synchronously from within the mutating call that caused them,
/// after the state change has been applied:
///
/// - `place_chip`: `ChipPlaced`, then either `GameOver` (terminal) or
///   `SwitchTurn`.
/// - `start_new_game`: `GameReset` before the board is cleared, `NewGame`
///   last. `GameReset` is the point where a listener may push updated
///   settings (first player chip, computer opponent) into the engine so they
///   take effect for the new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ChipPlaced,
    SwitchTurn,
    GameOver(GameStatus),
    GameReset,
    NewGame,
}

/// A registered event callback. Listeners are invoked in registration order
/// and must not call `subscribe` from inside the callback.
pub type Listener = Box<dyn FnMut(&GameEvent) + Send>;
