use std::sync::{Arc, Mutex, Weak};
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::EngineError;

use super::board::{Board, WinResult};
use super::chip::{Chip, GameStatus};
use super::events::{GameEvent, Listener};

/// Default "thinking" pause before a computer move commits, in milliseconds.
const DEFAULT_DELAY_MS: (u64, u64) = (500, 1500);

struct EngineState {
    board: Board,
    current_turn: Chip,
    first_player_chip: Chip,
    red_score: u32,
    yellow_score: u32,
    opponent_is_computer: bool,
    delay_ms: (u64, u64),
    rng: StdRng,
}

struct Inner {
    state: Mutex<EngineState>,
    listeners: Mutex<Vec<Listener>>,
}

/// The Connect Four game engine: grid state, turn order, scoring, win
/// detection, event emission, and the random-move computer opponent.
///
/// Cloning yields another handle to the same engine. All mutations go through
/// one internal mutex, so the delayed computer move re-enters through the
/// same serialization point as direct input. Events are emitted after the
/// state lock is released (but still before the mutating call returns), so a
/// listener may freely query the engine or push settings into it.
#[derive(Clone)]
pub struct BoardEngine {
    inner: Arc<Inner>,
}

impl BoardEngine {
    /// Create an engine with an empty board and zeroed scores, then run the
    /// same reset sequence as [`start_new_game`](Self::start_new_game) with
    /// scores kept.
    ///
    /// Fails with `InvalidDimension` for a grid smaller than 7x6 and with
    /// `InvalidChip` if the first player chip is `Empty`.
    pub fn new(
        columns: usize,
        rows: usize,
        first_player_chip: Chip,
        opponent_is_computer: bool,
    ) -> Result<Self, EngineError> {
        if first_player_chip == Chip::Empty {
            return Err(EngineError::InvalidChip);
        }
        let board = Board::new(columns, rows)?;

        let engine = BoardEngine {
            inner: Arc::new(Inner {
                state: Mutex::new(EngineState {
                    board,
                    current_turn: first_player_chip,
                    first_player_chip,
                    red_score: 0,
                    yellow_score: 0,
                    opponent_is_computer,
                    delay_ms: DEFAULT_DELAY_MS,
                    rng: StdRng::from_os_rng(),
                }),
                listeners: Mutex::new(Vec::new()),
            }),
        };
        engine.start_new_game(false);
        Ok(engine)
    }

    /// Register an event listener, appended after any existing ones.
    pub fn subscribe(&self, listener: impl FnMut(&GameEvent) + Send + 'static) {
        self.inner.listeners.lock().unwrap().push(Box::new(listener));
    }

    fn emit(&self, event: GameEvent) {
        let mut listeners = self.inner.listeners.lock().unwrap();
        for listener in listeners.iter_mut() {
            listener(&event);
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, EngineState> {
        self.inner.state.lock().unwrap()
    }

    // --- queries ---

    pub fn columns(&self) -> usize {
        self.state().board.columns()
    }

    pub fn rows(&self) -> usize {
        self.state().board.rows()
    }

    /// The chip occupying `(row, col)`; row 0 is the top row.
    pub fn cell(&self, row: usize, col: usize) -> Chip {
        self.state().board.get(row, col)
    }

    pub fn current_turn(&self) -> Chip {
        self.state().current_turn
    }

    pub fn first_player_chip(&self) -> Chip {
        self.state().first_player_chip
    }

    /// Games won by `chip`. `Empty` has no score and reports 0.
    pub fn score(&self, chip: Chip) -> u32 {
        let state = self.state();
        match chip {
            Chip::Red => state.red_score,
            Chip::Yellow => state.yellow_score,
            Chip::Empty => 0,
        }
    }

    pub fn opponent_is_computer(&self) -> bool {
        self.state().opponent_is_computer
    }

    /// The chip the computer plays: the opposite of the first player's.
    pub fn computer_player_chip(&self) -> Chip {
        self.state().first_player_chip.other()
    }

    /// True iff the opponent is a computer and it is the computer's turn.
    pub fn is_computer_turn(&self) -> bool {
        let state = self.state();
        state.opponent_is_computer && state.current_turn == state.first_player_chip.other()
    }

    pub fn is_column_available(&self, col: usize) -> Result<bool, EngineError> {
        self.state().board.is_column_available(col)
    }

    pub fn available_columns(&self) -> Vec<usize> {
        self.state().board.available_columns()
    }

    pub fn is_filled(&self) -> bool {
        self.state().board.is_filled()
    }

    pub fn game_status(&self) -> GameStatus {
        self.state().board.status()
    }

    /// Winning cells for whichever chip currently has a line, Red checked
    /// first. Empty result when nobody has won.
    pub fn win_locations(&self) -> WinResult {
        let state = self.state();
        let red = state.board.win_locations(Chip::Red);
        if red.won() {
            return red;
        }
        state.board.win_locations(Chip::Yellow)
    }

    // --- settings, pushed by the presentation layer on GameReset ---

    /// Change which chip moves first (and therefore which chip the computer
    /// plays). Takes effect when the next game starts.
    pub fn set_first_player_chip(&self, chip: Chip) -> Result<(), EngineError> {
        if chip == Chip::Empty {
            return Err(EngineError::InvalidChip);
        }
        self.state().first_player_chip = chip;
        Ok(())
    }

    pub fn set_opponent_computer(&self, computer: bool) {
        self.state().opponent_is_computer = computer;
    }

    /// Override the computer's thinking pause. The commit delay is drawn
    /// uniformly from `[min_ms, max_ms)`.
    pub fn set_computer_delay_ms(&self, min_ms: u64, max_ms: u64) {
        self.state().delay_ms = (min_ms, max_ms.max(min_ms + 1));
    }

    // --- mutations ---

    /// Drop `chip` into `col`.
    ///
    /// Emits `ChipPlaced`, then either `GameOver` (the winner's score is
    /// incremented, the turn does not advance) or `SwitchTurn` (the turn
    /// flips; if it is now the computer's turn, a computer move is
    /// scheduled). The caller's turn is not verified; the presentation layer
    /// gates whose input reaches the engine.
    ///
    /// On error nothing is mutated and no event fires.
    pub fn place_chip(&self, col: usize, chip: Chip) -> Result<(), EngineError> {
        let status = {
            let mut state = self.state();
            state.board.drop_chip(col, chip)?;

            let status = state.board.status();
            if status.is_terminal() {
                match status.winner() {
                    Some(Chip::Red) => state.red_score += 1,
                    Some(Chip::Yellow) => state.yellow_score += 1,
                    _ => {} // tie: nobody scores
                }
            } else {
                state.current_turn = state.current_turn.other();
            }
            status
        };

        self.emit(GameEvent::ChipPlaced);
        if status.is_terminal() {
            self.emit(GameEvent::GameOver(status));
        } else {
            self.emit(GameEvent::SwitchTurn);
            if self.is_computer_turn() {
                // Cannot fail: is_computer_turn was just checked.
                let _ = self.computer_move();
            }
        }
        Ok(())
    }

    /// Reset the board for a fresh game.
    ///
    /// Emits `GameReset` first, before anything changes: listeners may push
    /// new settings (`set_first_player_chip`, `set_opponent_computer`) here
    /// so they apply to the game being started. Then clears every cell,
    /// optionally zeroes both scores, and resets the turn to the first
    /// player's chip. If the computer is then to move, its move is scheduled.
    /// Emits `NewGame` last.
    pub fn start_new_game(&self, reset_scores: bool) {
        self.emit(GameEvent::GameReset);

        {
            let mut state = self.state();
            state.board.clear();
            if reset_scores {
                state.red_score = 0;
                state.yellow_score = 0;
            }
            state.current_turn = state.first_player_chip;
        }

        if self.is_computer_turn() {
            let _ = self.computer_move();
        }

        self.emit(GameEvent::NewGame);
    }

    /// Schedule the computer's move: pick a random available column now,
    /// commit it after a randomized thinking pause.
    ///
    /// Fails with `NotComputerTurn` unless the opponent is a computer and it
    /// is its turn. With no available column this is a no-op (a full board is
    /// terminal, so it should not occur). The scheduled move runs on a
    /// detached thread and re-validates before committing; a move made stale
    /// by an intervening new game or settings change is silently dropped.
    pub fn computer_move(&self) -> Result<(), EngineError> {
        let (column, chip, delay) = {
            let mut state = self.state();
            let computer_chip = state.first_player_chip.other();
            if !state.opponent_is_computer || state.current_turn != computer_chip {
                return Err(EngineError::NotComputerTurn);
            }

            let available = state.board.available_columns();
            if available.is_empty() {
                // A full board is terminal, so this should never be reached.
                return Ok(());
            }
            let column = available[state.rng.random_range(0..available.len())];

            let (min_ms, max_ms) = state.delay_ms;
            let delay = Duration::from_millis(state.rng.random_range(min_ms..max_ms));
            (column, computer_chip, delay)
        };

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        thread::spawn(move || {
            thread::sleep(delay);
            let Some(inner) = weak.upgrade() else {
                return; // engine dropped while thinking
            };
            let engine = BoardEngine { inner };

            // Re-validate at fire time; a stale move is dropped, not raised.
            let still_valid = {
                let state = engine.state();
                state.opponent_is_computer
                    && state.current_turn == chip
                    && state.first_player_chip.other() == chip
                    && state.board.is_column_available(column).unwrap_or(false)
                    && !state.board.status().is_terminal()
            };
            if still_valid {
                let _ = engine.place_chip(column, chip);
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    use super::*;

    fn engine() -> BoardEngine {
        BoardEngine::new(7, 6, Chip::Red, false).unwrap()
    }

    /// Subscribe a channel-backed listener and return the receiver.
    fn events_of(engine: &BoardEngine) -> mpsc::Receiver<GameEvent> {
        let (tx, rx) = mpsc::channel();
        engine.subscribe(move |event| {
            let _ = tx.send(*event);
        });
        rx
    }

    fn drain(rx: &mpsc::Receiver<GameEvent>) -> Vec<GameEvent> {
        rx.try_iter().collect()
    }

    #[test]
    fn test_construction_validation() {
        assert!(matches!(
            BoardEngine::new(6, 6, Chip::Red, false),
            Err(EngineError::InvalidDimension { .. })
        ));
        assert!(matches!(
            BoardEngine::new(7, 6, Chip::Empty, false),
            Err(EngineError::InvalidChip)
        ));
    }

    #[test]
    fn test_initial_state() {
        let engine = engine();
        assert_eq!(engine.current_turn(), Chip::Red);
        assert_eq!(engine.first_player_chip(), Chip::Red);
        assert_eq!(engine.computer_player_chip(), Chip::Yellow);
        assert_eq!(engine.game_status(), GameStatus::Ongoing);
        assert_eq!(engine.score(Chip::Red), 0);
        assert_eq!(engine.score(Chip::Yellow), 0);
        assert!(!engine.is_computer_turn());
        assert_eq!(engine.available_columns(), vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_turn_alternates_strictly() {
        let engine = engine();
        engine.place_chip(0, Chip::Red).unwrap();
        assert_eq!(engine.current_turn(), Chip::Yellow);
        engine.place_chip(1, Chip::Yellow).unwrap();
        assert_eq!(engine.current_turn(), Chip::Red);
        engine.place_chip(2, Chip::Red).unwrap();
        assert_eq!(engine.current_turn(), Chip::Yellow);
    }

    #[test]
    fn test_place_events_in_order() {
        let engine = engine();
        let rx = events_of(&engine);

        engine.place_chip(3, Chip::Red).unwrap();
        assert_eq!(drain(&rx), vec![GameEvent::ChipPlaced, GameEvent::SwitchTurn]);
    }

    #[test]
    fn test_failed_place_mutates_nothing_and_fires_nothing() {
        let engine = engine();
        // Fill column 0 without forming a vertical line.
        for chip in [Chip::Red, Chip::Yellow, Chip::Red, Chip::Yellow, Chip::Red, Chip::Yellow] {
            engine.place_chip(0, chip).unwrap();
        }
        let turn_before = engine.current_turn();
        let rx = events_of(&engine);

        assert!(matches!(
            engine.place_chip(0, Chip::Red),
            Err(EngineError::ColumnFull { column: 0 })
        ));
        assert!(matches!(
            engine.place_chip(9, Chip::Red),
            Err(EngineError::OutOfRange { .. })
        ));
        assert!(matches!(
            engine.place_chip(1, Chip::Empty),
            Err(EngineError::InvalidChip)
        ));

        assert_eq!(engine.current_turn(), turn_before);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn test_win_scores_and_stops_turn() {
        let engine = engine();
        let rx = events_of(&engine);

        // Red builds the bottom row of columns 0..3, Yellow stacks on 6.
        for col in 0..3 {
            engine.place_chip(col, Chip::Red).unwrap();
            engine.place_chip(6, Chip::Yellow).unwrap();
        }
        drain(&rx);
        engine.place_chip(3, Chip::Red).unwrap();

        assert_eq!(engine.game_status(), GameStatus::RedWon);
        assert_eq!(engine.score(Chip::Red), 1);
        assert_eq!(engine.score(Chip::Yellow), 0);
        // Terminal move does not advance the turn.
        assert_eq!(engine.current_turn(), Chip::Red);
        assert_eq!(
            drain(&rx),
            vec![GameEvent::ChipPlaced, GameEvent::GameOver(GameStatus::RedWon)]
        );

        let expected: std::collections::BTreeSet<(usize, usize)> =
            (0..4).map(|col| (5, col)).collect();
        assert_eq!(engine.win_locations().cells, expected);
    }

    #[test]
    fn test_tie_scores_nobody() {
        let engine = engine();
        // (row / 2 + col) parity coloring fills the board with no winner.
        for col in 0..7 {
            for row in (0..6).rev() {
                let chip = if (row / 2 + col) % 2 == 0 { Chip::Red } else { Chip::Yellow };
                engine.place_chip(col, chip).unwrap();
            }
        }

        assert!(engine.is_filled());
        assert_eq!(engine.game_status(), GameStatus::Tied);
        assert_eq!(engine.score(Chip::Red), 0);
        assert_eq!(engine.score(Chip::Yellow), 0);
        assert!(!engine.win_locations().won());
    }

    #[test]
    fn test_new_game_clears_board_and_resets_turn() {
        let engine = engine();
        engine.place_chip(0, Chip::Red).unwrap();
        assert_eq!(engine.current_turn(), Chip::Yellow);
        let rx = events_of(&engine);

        engine.start_new_game(false);

        assert_eq!(drain(&rx), vec![GameEvent::GameReset, GameEvent::NewGame]);
        assert_eq!(engine.current_turn(), Chip::Red);
        assert_eq!(engine.cell(5, 0), Chip::Empty);
        assert_eq!(engine.game_status(), GameStatus::Ongoing);
    }

    #[test]
    fn test_new_game_score_handling() {
        let engine = engine();
        // Red wins a quick game.
        for col in 0..3 {
            engine.place_chip(col, Chip::Red).unwrap();
            engine.place_chip(6, Chip::Yellow).unwrap();
        }
        engine.place_chip(3, Chip::Red).unwrap();
        assert_eq!(engine.score(Chip::Red), 1);

        engine.start_new_game(false);
        assert_eq!(engine.score(Chip::Red), 1);

        engine.start_new_game(true);
        assert_eq!(engine.score(Chip::Red), 0);
        assert_eq!(engine.score(Chip::Yellow), 0);
    }

    #[test]
    fn test_game_reset_is_settings_extension_point() {
        let engine = engine();
        let pusher = engine.clone();
        engine.subscribe(move |event| {
            if *event == GameEvent::GameReset {
                pusher.set_first_player_chip(Chip::Yellow).unwrap();
                pusher.set_opponent_computer(true);
            }
        });

        engine.start_new_game(false);

        assert_eq!(engine.first_player_chip(), Chip::Yellow);
        assert_eq!(engine.computer_player_chip(), Chip::Red);
        assert!(engine.opponent_is_computer());
        // Turn was reset to the freshly pushed first player chip.
        assert_eq!(engine.current_turn(), Chip::Yellow);
        assert!(!engine.is_computer_turn());
    }

    #[test]
    fn test_listeners_invoked_in_registration_order() {
        let engine = engine();
        let log = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second"] {
            let log = Arc::clone(&log);
            engine.subscribe(move |event| {
                if *event == GameEvent::ChipPlaced {
                    log.lock().unwrap().push(tag);
                }
            });
        }

        engine.place_chip(0, Chip::Red).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_computer_move_requires_computer_turn() {
        let engine = engine();
        // Opponent is human.
        assert!(matches!(
            engine.computer_move(),
            Err(EngineError::NotComputerTurn)
        ));

        let engine = BoardEngine::new(7, 6, Chip::Red, true).unwrap();
        // Computer plays Yellow but it is Red's turn.
        assert!(matches!(
            engine.computer_move(),
            Err(EngineError::NotComputerTurn)
        ));
    }

    #[test]
    fn test_computer_replies_within_delay_window() {
        let engine = BoardEngine::new(7, 6, Chip::Red, true).unwrap();
        engine.set_computer_delay_ms(1, 10);
        let rx = events_of(&engine);

        // Red moves; the engine schedules Yellow's reply.
        engine.place_chip(3, Chip::Red).unwrap();
        assert_eq!(engine.current_turn(), Chip::Yellow);
        assert!(engine.is_computer_turn());

        // Wait for the reply's ChipPlaced + SwitchTurn.
        let deadline = Instant::now() + Duration::from_secs(2);
        let mut seen = Vec::new();
        while seen.len() < 4 && Instant::now() < deadline {
            if let Ok(event) = rx.recv_timeout(Duration::from_millis(50)) {
                seen.push(event);
            }
        }
        assert_eq!(
            seen,
            vec![
                GameEvent::ChipPlaced,
                GameEvent::SwitchTurn,
                GameEvent::ChipPlaced,
                GameEvent::SwitchTurn,
            ]
        );
        assert_eq!(engine.current_turn(), Chip::Red);

        // Exactly one Yellow chip on the board, in a column that was open.
        let yellow_count = (0..6)
            .flat_map(|row| (0..7).map(move |col| (row, col)))
            .filter(|&(row, col)| engine.cell(row, col) == Chip::Yellow)
            .count();
        assert_eq!(yellow_count, 1);
    }

    #[test]
    fn test_stale_computer_move_is_dropped() {
        let engine = BoardEngine::new(7, 6, Chip::Red, true).unwrap();
        engine.set_computer_delay_ms(30, 60);

        // Schedule Yellow's reply, then immediately start a new game and turn
        // the computer opponent off before the move can fire.
        engine.place_chip(3, Chip::Red).unwrap();
        engine.set_opponent_computer(false);
        engine.start_new_game(false);

        std::thread::sleep(Duration::from_millis(120));
        // The stale move was dropped: the board is still empty.
        for row in 0..6 {
            for col in 0..7 {
                assert_eq!(engine.cell(row, col), Chip::Empty);
            }
        }
        assert_eq!(engine.current_turn(), Chip::Red);
    }
}
