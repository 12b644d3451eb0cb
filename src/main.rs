use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use connect_four::config::Settings;
use connect_four::game::BoardEngine;
use connect_four::ui::App;

/// Play Connect Four in the terminal.
#[derive(Parser)]
#[command(name = "connect-four", about = "Connect Four with an optional computer opponent")]
struct Cli {
    /// Number of board columns (minimum 7)
    #[arg(long, default_value_t = 7)]
    columns: usize,

    /// Number of board rows (minimum 6)
    #[arg(long, default_value_t = 6)]
    rows: usize,

    /// Path to the TOML settings file
    #[arg(long, default_value = "settings.toml")]
    settings: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load_or_default(&cli.settings)
        .with_context(|| format!("loading settings from {}", cli.settings.display()))?;

    let engine = BoardEngine::new(
        cli.columns,
        cli.rows,
        settings.first_player_chip(),
        settings.opponent_is_computer,
    )
    .context("creating game board")?;

    let mut app = App::new(engine, settings);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal — always runs, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res.context("running terminal UI")?;

    app.settings()
        .save(&cli.settings)
        .with_context(|| format!("saving settings to {}", cli.settings.display()))?;

    Ok(())
}
