use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::game::{BoardEngine, Chip, GameStatus};

pub fn render(
    frame: &mut Frame,
    engine: &BoardEngine,
    selected_column: usize,
    message: &Option<String>,
    sound_muted: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Board
            Constraint::Length(3), // Message
            Constraint::Length(4), // Controls
        ])
        .split(frame.area());

    render_header(frame, engine, sound_muted, chunks[0]);
    render_board(frame, engine, selected_column, chunks[1]);
    render_message(frame, message, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn chip_color(chip: Chip) -> Color {
    match chip {
        Chip::Red => Color::Red,
        Chip::Yellow => Color::Yellow,
        Chip::Empty => Color::DarkGray,
    }
}

fn render_header(
    frame: &mut Frame,
    engine: &BoardEngine,
    sound_muted: bool,
    area: ratatui::layout::Rect,
) {
    let mode = if engine.opponent_is_computer() {
        format!("vs Computer ({})", engine.computer_player_chip().name())
    } else {
        "Two Players".to_string()
    };
    let sound = if sound_muted { "muted" } else { "sound on" };

    let (status, color) = match engine.game_status() {
        GameStatus::Ongoing => {
            let turn = engine.current_turn();
            let text = if engine.is_computer_turn() {
                format!("{} is thinking...", turn.name())
            } else {
                format!("Current Player: {}", turn.name())
            };
            (text, chip_color(turn))
        }
        GameStatus::Tied => ("Tied game".to_string(), Color::White),
        GameStatus::RedWon => ("Red wins!".to_string(), Color::Red),
        GameStatus::YellowWon => ("Yellow wins!".to_string(), Color::Yellow),
    };

    let header = Paragraph::new(format!(
        "{status}  |  Red {} : {} Yellow  |  {mode}  |  {sound}",
        engine.score(Chip::Red),
        engine.score(Chip::Yellow),
    ))
    .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Connect Four"));

    frame.render_widget(header, area);
}

fn render_board(
    frame: &mut Frame,
    engine: &BoardEngine,
    selected_column: usize,
    area: ratatui::layout::Rect,
) {
    let columns = engine.columns();
    let rows = engine.rows();
    let win_cells = engine.win_locations().cells;

    let mut lines = Vec::new();

    // Column numbers with selection indicator.
    let mut col_line = vec![Span::raw("   ")];
    for col in 0..columns {
        let label = format!("{:^3}", col + 1);
        if col == selected_column {
            col_line.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(label));
        }
    }
    lines.push(Line::from(col_line));

    lines.push(Line::from(format!("  ╔{}╗", "═".repeat(columns * 3))));

    for row in 0..rows {
        let mut row_spans = vec![Span::raw("  ║")];
        for col in 0..columns {
            let chip = engine.cell(row, col);
            let symbol = if chip == Chip::Empty { " . " } else { " ● " };
            let mut style = Style::default().fg(chip_color(chip));
            if win_cells.contains(&(row, col)) {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            row_spans.push(Span::styled(symbol, style));
        }
        row_spans.push(Span::raw("║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from(format!("  ╚{}╝", "═".repeat(columns * 3))));

    // Selection indicator below the board.
    let mut indicator = vec![Span::raw("   ")];
    for col in 0..columns {
        if col == selected_column {
            indicator.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator.push(Span::raw("   "));
        }
    }
    lines.push(Line::from(indicator));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: ratatui::layout::Rect) {
    let text = message.as_deref().unwrap_or("");
    let widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: ratatui::layout::Rect) {
    let line1 = Line::from("←/→: Move  |  Enter: Drop  |  N: New Game  |  Shift+N: Reset Scores  |  Q: Quit");
    let line2 = Line::from("C: Toggle Computer Opponent  |  S: Swap Opponent Color  |  M: Mute");

    let controls = Paragraph::new(vec![line1, line2])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}
