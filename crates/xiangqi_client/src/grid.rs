//! The 10x9 display surface: cell contents, visual flags and hit testing.
//!
//! The grid holds no game logic. It mirrors whatever board it was last asked
//! to render, and flags set by the selection controller.

use derive_getters::Getters;
use ratatui::layout::Rect;
use tracing::{debug, instrument, warn};
use xiangqi_board::{Board, COLS, Coord, ROWS, Side};

/// Terminal columns per cell.
pub const CELL_WIDTH: u16 = 4;

/// Terminal rows per cell.
pub const CELL_HEIGHT: u16 = 2;

/// Width of the whole grid in terminal columns.
pub const GRID_WIDTH: u16 = CELL_WIDTH * COLS as u16;

/// Height of the whole grid in terminal rows.
pub const GRID_HEIGHT: u16 = CELL_HEIGHT * ROWS as u16;

/// What a cell shows: the side picks the style class, the label is the kind.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Glyph {
    side: Side,
    label: String,
}

/// One addressable cell.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Cell {
    coord: Coord,
    glyph: Option<Glyph>,
    selected: bool,
    highlighted: bool,
}

impl Cell {
    fn empty(coord: Coord) -> Self {
        Self {
            coord,
            glyph: None,
            selected: false,
            highlighted: false,
        }
    }
}

/// The board surface.
#[derive(Debug, Default)]
pub struct BoardGrid {
    cells: Vec<Cell>,
    area: Option<Rect>,
}

impl BoardGrid {
    /// Creates an unbuilt grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Materializes the 90 cells. Later calls leave existing cells alone.
    #[instrument(skip(self))]
    pub fn build(&mut self) {
        if self.is_built() {
            debug!("Grid already built");
            return;
        }
        self.cells = Coord::all().map(Cell::empty).collect();
        debug!(cells = self.cells.len(), "Grid built");
    }

    /// Whether [`build`](Self::build) has run.
    pub fn is_built(&self) -> bool {
        !self.cells.is_empty()
    }

    /// Replaces every cell's contents with what `board` holds. Flags are untouched.
    #[instrument(skip_all)]
    pub fn render(&mut self, board: &Board) {
        if !self.is_built() {
            warn!("Render requested before the grid was built");
            return;
        }
        for cell in &mut self.cells {
            cell.glyph = board.get(cell.coord).map(|piece| Glyph {
                side: piece.side(),
                label: piece.kind().to_string(),
            });
        }
    }

    /// Sets or clears the selected flag on one cell.
    pub fn set_selected(&mut self, coord: Coord, on: bool) {
        if let Some(cell) = self.cells.get_mut(coord.index()) {
            cell.selected = on;
        }
    }

    /// Sets or clears the highlight flag on one cell.
    pub fn set_highlighted(&mut self, coord: Coord, on: bool) {
        if let Some(cell) = self.cells.get_mut(coord.index()) {
            cell.highlighted = on;
        }
    }

    /// Clears every highlight marker.
    pub fn clear_all_highlights(&mut self) {
        for cell in &mut self.cells {
            cell.highlighted = false;
        }
    }

    /// The cell at `coord`, once built.
    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.cells.get(coord.index())
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells currently flagged selected.
    pub fn selected_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.selected).count()
    }

    /// Records where the grid was last drawn, for hit testing.
    pub fn place(&mut self, area: Rect) {
        self.area = Some(area);
    }

    /// Screen rectangle of one cell, once placed.
    pub fn cell_rect(&self, coord: Coord) -> Option<Rect> {
        let area = self.area?;
        let rect = Rect::new(
            area.x + coord.col() as u16 * CELL_WIDTH,
            area.y + coord.row() as u16 * CELL_HEIGHT,
            CELL_WIDTH,
            CELL_HEIGHT,
        );
        Some(rect.intersection(area)).filter(|r| !r.is_empty())
    }

    /// The cell under a terminal position, if any.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<Coord> {
        let area = self.area?;
        if column < area.x || row < area.y {
            return None;
        }
        let dx = column - area.x;
        let dy = row - area.y;
        if dx >= GRID_WIDTH.min(area.width) || dy >= GRID_HEIGHT.min(area.height) {
            return None;
        }
        Coord::new((dy / CELL_HEIGHT) as usize, (dx / CELL_WIDTH) as usize)
    }
}
