//! UI rendering using ratatui.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::app::App;
use super::board_view::BoardView;
use crate::grid::{GRID_HEIGHT, GRID_WIDTH};

/// Draws the main UI and records where the board landed for hit testing.
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(GRID_HEIGHT + 2),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Xiangqi")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let board_area = center_rect(chunks[1], GRID_WIDTH + 2, GRID_HEIGHT + 2);
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(board_area);
    f.render_widget(block, board_area);
    app.context_mut().grid_mut().place(inner);
    let cursor = app.cursor();
    f.render_widget(BoardView::new(app.context().grid()).cursor(cursor), inner);

    let context = app.context();
    let status_text = match context.notice() {
        Some(notice) => format!("{} | {}", context.turn_indicator(), notice),
        None if context.request_in_flight() => format!("{} | waiting...", context.turn_indicator()),
        None => context.turn_indicator().to_string(),
    };
    let status = Paragraph::new(status_text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[2]);

    let help = Paragraph::new("Click or Enter: select/move | Arrows: cursor | R: Reset | Q: Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);

    if let Some(announcement) = app.popup() {
        let area = center_rect(f.area(), 36, 5);
        f.render_widget(Clear, area);
        let popup = Paragraph::new(format!("{}\n\nPress any key", announcement.message()))
            .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Game Over"));
        f.render_widget(popup, area);
    }
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}
