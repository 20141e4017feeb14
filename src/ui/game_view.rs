use super::Playable;
use crate::game::Cell;
use crate::session::{MatchStatus, Snapshot};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render<B: Playable>(
    frame: &mut Frame,
    snapshot: &Snapshot<B::Move>,
    cursor: (usize, usize),
    message: &Option<String>,
    status_line: &str,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(11),   // Board
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, snapshot, status_line, chunks[0]);
    render_board::<B>(frame, snapshot, cursor, chunks[1]);
    render_message(frame, message, chunks[2]);
    render_controls::<B>(frame, chunks[3]);
}

fn render_header<M>(frame: &mut Frame, snapshot: &Snapshot<M>, status_line: &str, area: Rect) {
    let color = if snapshot.current_turn == snapshot.first {
        Color::Red
    } else {
        Color::Yellow
    };

    let status = if snapshot.status.is_terminal() {
        format!("Game Over  |  {}", status_line)
    } else {
        format!("To move: {}", status_line)
    };

    let header = Paragraph::new(status)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(snapshot.variant));

    frame.render_widget(header, area);
}

fn cell_span(cell: Cell, gravity: bool) -> (&'static str, Color) {
    match (cell, gravity) {
        (Cell::Empty, _) => (" . ", Color::DarkGray),
        (Cell::X, true) => (" ● ", Color::Red),
        (Cell::O, true) => (" ● ", Color::Yellow),
        (Cell::X, false) => (" X ", Color::Red),
        (Cell::O, false) => (" O ", Color::Yellow),
    }
}

fn render_board<B: Playable>(
    frame: &mut Frame,
    snapshot: &Snapshot<B::Move>,
    cursor: (usize, usize),
    area: Rect,
) {
    let (cursor_row, cursor_col) = cursor;
    let finished = snapshot.status.is_terminal();
    let run = snapshot.winning_run.as_deref().unwrap_or(&[]);
    let border = "═".repeat(B::COLS * 3 + 1);
    let last = snapshot.last_move.map(B::locate);
    let mut lines = Vec::new();

    if B::GRAVITY {
        // Column numbers with selection indicator; ↓ flags the last drop
        let mut col_line = vec![Span::raw("   ")];
        for col in 0..B::COLS {
            let label = if last.is_some_and(|(_, c)| c == col) {
                format!("↓{} ", col + 1)
            } else {
                format!(" {} ", col + 1)
            };
            if col == cursor_col && !finished {
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
        col_line.push(Span::raw("  "));
        lines.push(Line::from(col_line));
    }

    lines.push(Line::from(format!("  ╔{border}╗")));

    // Row 0 sits at the bottom of a gravity board
    let rows: Vec<usize> = if B::GRAVITY {
        (0..B::ROWS).rev().collect()
    } else {
        (0..B::ROWS).collect()
    };
    for row in rows {
        let mut row_spans = vec![Span::raw("  ║")];
        for col in 0..B::COLS {
            let (symbol, color) = cell_span(snapshot.cells[row][col], B::GRAVITY);
            let mut style = Style::default().fg(color);
            if run.contains(&(row, col)) {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            if last == Some((Some(row), col)) {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            if !B::GRAVITY && !finished && (row, col) == (cursor_row, cursor_col) {
                style = style.bg(Color::Cyan);
            }
            row_spans.push(Span::styled(symbol, style));
        }
        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from(format!("  ╚{border}╝")));

    if B::GRAVITY && !finished {
        let mut indicator_line = vec![Span::raw("   ")];
        for col in 0..B::COLS {
            if col == cursor_col {
                indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
            } else {
                indicator_line.push(Span::raw("   "));
            }
        }
        indicator_line.push(Span::raw("  "));
        lines.push(Line::from(indicator_line));
    }

    if snapshot.status == MatchStatus::Abandoned {
        lines.push(Line::from(Span::styled(
            "(abandoned)",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: Rect) {
    let text = message.as_deref().unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls<B: Playable>(frame: &mut Frame, area: Rect) {
    let keys = if B::GRAVITY {
        "←/→: Move  |  Enter: Drop  |  F: Forfeit  |  R: Restart  |  Q: Quit"
    } else {
        "Arrows: Move  |  Enter: Place  |  F: Forfeit  |  R: Restart  |  Q: Quit"
    };

    let controls = Paragraph::new(Line::from(keys))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}
