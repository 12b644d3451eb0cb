use std::io;
use std::sync::{mpsc, Arc, Mutex};

use crossterm::event::{self, Event, KeyCode, KeyEvent};
use ratatui::{backend::Backend, Terminal};

use crate::config::Settings;
use crate::game::{BoardEngine, Chip, GameEvent, GameStatus};

pub struct App {
    engine: BoardEngine,
    settings: Arc<Mutex<Settings>>,
    events: mpsc::Receiver<GameEvent>,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    /// Wire the presentation layer to the engine: a listener that pushes the
    /// current settings into the engine on `GameReset`, and a channel that
    /// carries engine events into the UI loop (the computer's delayed move
    /// fires them from its own thread).
    pub fn new(engine: BoardEngine, settings: Settings) -> Self {
        let settings = Arc::new(Mutex::new(settings));

        let pusher = engine.clone();
        let shared = Arc::clone(&settings);
        engine.subscribe(move |event| {
            if *event == GameEvent::GameReset {
                let settings = *shared.lock().unwrap();
                let _ = pusher.set_first_player_chip(settings.first_player_chip());
                pusher.set_opponent_computer(settings.opponent_is_computer);
            }
        });

        let (tx, rx) = mpsc::channel();
        engine.subscribe(move |event| {
            let _ = tx.send(*event);
        });

        let selected_column = engine.columns() / 2;
        App {
            engine,
            settings,
            events: rx,
            selected_column,
            should_quit: false,
            message: None,
        }
    }

    /// The settings as last edited in the UI, for persisting on exit.
    pub fn settings(&self) -> Settings {
        *self.settings.lock().unwrap()
    }

    /// Main application loop.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
            self.drain_engine_events();
        }
        Ok(())
    }

    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    /// Engine events arriving between frames, including those fired by the
    /// computer's move thread.
    fn drain_engine_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                GameEvent::GameOver(status) => {
                    self.message = Some(match status {
                        GameStatus::RedWon => "Red wins! Press 'n' for a new game.".to_string(),
                        GameStatus::YellowWon => {
                            "Yellow wins! Press 'n' for a new game.".to_string()
                        }
                        GameStatus::Tied => "It's a tie! Press 'n' for a new game.".to_string(),
                        GameStatus::Ongoing => continue,
                    });
                }
                GameEvent::NewGame => {
                    self.message = Some("New game started!".to_string());
                }
                // Placement and turn changes show up on the next redraw.
                GameEvent::ChipPlaced | GameEvent::SwitchTurn | GameEvent::GameReset => {}
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                }
            }
            KeyCode::Right => {
                if self.selected_column + 1 < self.engine.columns() {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_chip();
            }
            KeyCode::Char('n') => {
                self.engine.start_new_game(false);
            }
            KeyCode::Char('N') => {
                self.engine.start_new_game(true);
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                let mut settings = self.settings.lock().unwrap();
                settings.opponent_is_computer = !settings.opponent_is_computer;
                self.message = Some(if settings.opponent_is_computer {
                    "Computer opponent on (next game).".to_string()
                } else {
                    "Two-player mode (next game).".to_string()
                });
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                let mut settings = self.settings.lock().unwrap();
                settings.opponent_chip_yellow = !settings.opponent_chip_yellow;
                let chip = if settings.opponent_chip_yellow {
                    Chip::Yellow
                } else {
                    Chip::Red
                };
                self.message = Some(format!("Opponent plays {} (next game).", chip.name()));
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                let mut settings = self.settings.lock().unwrap();
                settings.sound_muted = !settings.sound_muted;
                self.message = Some(if settings.sound_muted {
                    "Sound muted.".to_string()
                } else {
                    "Sound on.".to_string()
                });
            }
            _ => {}
        }
    }

    /// Drop a chip for the human player. The engine's preconditions are
    /// checked here, so `place_chip` is never called on a full column or
    /// during the computer's turn.
    fn drop_chip(&mut self) {
        if self.engine.game_status().is_terminal() {
            self.message = Some("Game over! Press 'n' for a new game.".to_string());
            return;
        }
        if self.engine.is_computer_turn() {
            self.message = Some("The computer is thinking...".to_string());
            return;
        }
        match self.engine.is_column_available(self.selected_column) {
            Ok(true) => {
                let turn = self.engine.current_turn();
                if let Err(err) = self.engine.place_chip(self.selected_column, turn) {
                    self.message = Some(err.to_string());
                }
            }
            Ok(false) => {
                // The full-column click signal stays in the presentation
                // layer; the engine is not called.
                self.message = Some("Column is full!".to_string());
            }
            Err(err) => {
                self.message = Some(err.to_string());
            }
        }
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        let sound_muted = self.settings.lock().unwrap().sound_muted;
        super::game_view::render(
            frame,
            &self.engine,
            self.selected_column,
            &self.message,
            sound_muted,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let engine = BoardEngine::new(7, 6, Chip::Red, false).unwrap();
        App::new(engine, Settings { opponent_is_computer: false, ..Settings::default() })
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::from(code));
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut app = app();
        for _ in 0..20 {
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.selected_column, 6);
        for _ in 0..20 {
            press(&mut app, KeyCode::Left);
        }
        assert_eq!(app.selected_column, 0);
    }

    #[test]
    fn test_drop_places_current_turn_chip() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.engine.cell(5, 3), Chip::Red);
        assert_eq!(app.engine.current_turn(), Chip::Yellow);
    }

    #[test]
    fn test_full_column_message_without_engine_call() {
        let mut app = app();
        app.selected_column = 0;
        for _ in 0..6 {
            press(&mut app, KeyCode::Enter);
        }
        let turn_before = app.engine.current_turn();

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.message.as_deref(), Some("Column is full!"));
        assert_eq!(app.engine.current_turn(), turn_before);
    }

    #[test]
    fn test_settings_pushed_on_new_game() {
        let mut app = app();
        // Swap the opponent to Red and enable the computer; both apply on the
        // next game via the GameReset listener.
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('c'));
        assert!(!app.engine.opponent_is_computer());

        app.engine.start_new_game(false);
        assert!(app.engine.opponent_is_computer());
        assert_eq!(app.engine.first_player_chip(), Chip::Yellow);
        assert_eq!(app.engine.computer_player_chip(), Chip::Red);
        assert_eq!(app.engine.current_turn(), Chip::Yellow);
    }

    #[test]
    fn test_game_over_message_from_events() {
        let mut app = app();
        // Red wins down column 0 while Yellow plays column 6.
        for _ in 0..3 {
            app.selected_column = 0;
            press(&mut app, KeyCode::Enter); // Red
            app.selected_column = 6;
            press(&mut app, KeyCode::Enter); // Yellow
        }
        app.selected_column = 0;
        press(&mut app, KeyCode::Enter); // Red's fourth

        app.drain_engine_events();
        assert_eq!(
            app.message.as_deref(),
            Some("Red wins! Press 'n' for a new game.")
        );
        assert_eq!(app.engine.score(Chip::Red), 1);
    }
}
