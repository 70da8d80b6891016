use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::game::{Cell, GameState, Player, Position, Segment, COLS};

use super::App;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(11),   // Board
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_board(frame, app, chunks[1]);
    render_message(frame, app.message(), chunks[2]);
    render_controls(frame, chunks[3]);
}

fn player_color(player: Player) -> Color {
    match player {
        Player::First => Color::Red,
        Player::Second => Color::Yellow,
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let game = app.game();
    let mode = match (game.bot_player(), game.bot_name()) {
        (Some(player), Some(name)) => format!("{name} bot plays {}", player.name()),
        _ => "Two players".to_string(),
    };

    let (status, color) = match game.state() {
        GameState::Active | GameState::Paused => {
            let turn = game.turn();
            let who = if game.is_bot_turn() { " (thinking)" } else { "" };
            (
                format!("Current Player: {}{who}  |  {mode}", turn.name()),
                player_color(turn),
            )
        }
        GameState::Won { winner, .. } => (
            format!("{} wins  |  {mode}", winner.name()),
            player_color(winner),
        ),
        GameState::Tied => (format!("Draw  |  {mode}"), Color::White),
    };

    let header = Paragraph::new(status)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Connect Four"));

    frame.render_widget(header, area);
}

fn render_board(frame: &mut Frame, app: &App, area: Rect) {
    let game = app.game();
    let grid = game.board_snapshot();
    let selected_column = app.selected_column();
    let winning: Option<Segment> = match game.state() {
        GameState::Won { segment, .. } => Some(segment),
        _ => None,
    };
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")];
    for col in 0..COLS {
        if col == selected_column {
            col_line.push(Span::styled(
                format!(" {} ", col + 1),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(format!(" {} ", col + 1)));
        }
    }
    col_line.push(Span::raw("  "));
    lines.push(Line::from(col_line));

    lines.push(Line::from("  ╔══════════════════════╗"));

    for (row, cells) in grid.iter().enumerate() {
        let mut row_spans = vec![Span::raw("  ║")];

        for (col, cell) in cells.iter().enumerate() {
            let span = if app.is_clearing() {
                Span::styled(" . ", Style::default().fg(Color::DarkGray))
            } else {
                match cell {
                    Cell::Empty => Span::styled(" . ", Style::default().fg(Color::DarkGray)),
                    Cell::Occupied(player) => {
                        let mut style = Style::default().fg(player_color(*player));
                        let highlighted = Position::new(row, col)
                            .zip(winning)
                            .is_some_and(|(pos, segment)| segment.contains(pos));
                        if highlighted {
                            style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
                        }
                        Span::styled(" ● ", style)
                    }
                }
            };
            row_spans.push(span);
        }

        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from("  ╚══════════════════════╝"));

    let indicator_color = if game.state() == GameState::Active {
        player_color(game.turn())
    } else {
        Color::DarkGray
    };
    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..COLS {
        if col == selected_column && !game.board().is_column_full(col) {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(indicator_color)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  "));
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(frame: &mut Frame, message: Option<&str>, area: Rect) {
    let msg_widget = Paragraph::new(message.unwrap_or(""))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let line = Line::from("←/→: Move  |  Enter/1-7: Drop  |  P: Pause  |  Space: Play again  |  Q: Quit");

    let controls = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}
