//! Board widget: paints the grid's cells and flags.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;
use xiangqi_board::{Coord, Side};

use crate::grid::{BoardGrid, CELL_WIDTH, Cell};

/// Draws a [`BoardGrid`] at the area it was placed in.
#[derive(Debug)]
pub struct BoardView<'a> {
    grid: &'a BoardGrid,
    cursor: Option<Coord>,
}

impl<'a> BoardView<'a> {
    /// Creates a view of `grid`.
    pub fn new(grid: &'a BoardGrid) -> Self {
        Self { grid, cursor: None }
    }

    /// Marks the keyboard cursor cell.
    pub fn cursor(mut self, cursor: Coord) -> Self {
        self.cursor = Some(cursor);
        self
    }

    fn cell_style(&self, cell: &Cell) -> Style {
        let base = match cell.glyph() {
            Some(glyph) => match glyph.side() {
                Side::Red => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                Side::Black => Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            },
            None => Style::default().fg(Color::DarkGray),
        };
        let flagged = if *cell.selected() {
            base.bg(Color::Yellow)
        } else if *cell.highlighted() {
            base.bg(Color::Green)
        } else {
            base
        };
        if self.cursor == Some(*cell.coord()) {
            flagged.add_modifier(Modifier::REVERSED)
        } else {
            flagged
        }
    }
}

impl Widget for BoardView<'_> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        for cell in self.grid.cells() {
            let Some(rect) = self.grid.cell_rect(*cell.coord()) else {
                continue;
            };
            let rect = rect.intersection(buf.area);
            if rect.is_empty() {
                continue;
            }
            let style = self.cell_style(cell);
            buf.set_style(rect, style);

            let label = match cell.glyph() {
                Some(glyph) => glyph.label().as_str(),
                None => "·",
            };
            let width = (label.width() as u16).min(CELL_WIDTH);
            let x = rect.x + (CELL_WIDTH.saturating_sub(width)) / 2;
            buf.set_stringn(x, rect.y, label, CELL_WIDTH as usize, style);
        }
    }
}
