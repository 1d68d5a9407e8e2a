//! Core domain types for Xiangqi.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

use crate::wire::WireError;

/// Number of rows on the board.
pub const ROWS: usize = 10;

/// Number of columns on the board.
pub const COLS: usize = 9;

/// One of the two players.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize, strum::EnumIter,
)]
pub enum Side {
    /// Red (moves first).
    #[display("Red")]
    Red,
    /// Black.
    #[display("Black")]
    Black,
}

impl Side {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// Returns the single-letter wire code (`"r"` or `"b"`).
    pub fn code(self) -> &'static str {
        match self {
            Side::Red => "r",
            Side::Black => "b",
        }
    }

    /// Parses a wire code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "r" => Some(Side::Red),
            "b" => Some(Side::Black),
            _ => None,
        }
    }
}

/// A cell address on the 10x9 board, zero-based. Defaults to (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Display)]
#[display("({}, {})", row, col)]
pub struct Coord {
    row: u8,
    col: u8,
}

impl Coord {
    /// Creates a coordinate, or `None` when it falls off the board.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row < ROWS && col < COLS {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Row index (0-9).
    pub fn row(self) -> usize {
        self.row as usize
    }

    /// Column index (0-8).
    pub fn col(self) -> usize {
        self.col as usize
    }

    /// Row-major index (0-89).
    pub fn index(self) -> usize {
        self.row() * COLS + self.col()
    }

    /// Shifts by the given deltas, or `None` when the result leaves the board.
    pub fn offset(self, drow: isize, dcol: isize) -> Option<Self> {
        let row = self.row().checked_add_signed(drow)?;
        let col = self.col().checked_add_signed(dcol)?;
        Self::new(row, col)
    }

    /// Every coordinate in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..ROWS).flat_map(|row| (0..COLS).map(move |col| Coord {
            row: row as u8,
            col: col as u8,
        }))
    }
}

/// A piece: a side plus an opaque kind label.
///
/// The kind is whatever the rules engine calls the piece. It is rendered
/// as-is and never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    side: Side,
    kind: String,
}

impl Piece {
    /// Creates a piece.
    pub fn new(side: Side, kind: impl Into<String>) -> Self {
        Self {
            side,
            kind: kind.into(),
        }
    }

    /// The owning side.
    pub fn side(&self) -> Side {
        self.side
    }

    /// The kind label.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Encodes as `"<side>-<kind>"`.
    pub fn encode(&self) -> String {
        format!("{}-{}", self.side.code(), self.kind)
    }
}

impl FromStr for Piece {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (code, kind) = s
            .split_once('-')
            .ok_or_else(|| WireError::new(format!("Piece '{}' is not <side>-<kind>", s)))?;
        let side = Side::from_code(code)
            .ok_or_else(|| WireError::new(format!("Unknown side '{}' in piece '{}'", code, s)))?;
        if kind.is_empty() {
            return Err(WireError::new(format!("Piece '{}' has no kind", s)));
        }
        Ok(Piece::new(side, kind))
    }
}

/// The 10x9 board. At most one piece per cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[Option<Piece>; COLS]; ROWS],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard opening arrangement, black on rows 0-3 and red on rows 6-9.
    #[instrument]
    pub fn standard() -> Self {
        let mut board = Self::new();
        let placements = [
            (0, Side::Black, ["車", "馬", "象", "士", "將", "士", "象", "馬", "車"]),
            (9, Side::Red, ["俥", "傌", "相", "仕", "帥", "仕", "相", "傌", "俥"]),
        ];
        for (row, side, rank) in placements {
            for (col, kind) in rank.into_iter().enumerate() {
                board.cells[row][col] = Some(Piece::new(side, kind));
            }
        }
        for col in [1, 7] {
            board.cells[2][col] = Some(Piece::new(Side::Black, "砲"));
            board.cells[7][col] = Some(Piece::new(Side::Red, "炮"));
        }
        for col in [0, 2, 4, 6, 8] {
            board.cells[3][col] = Some(Piece::new(Side::Black, "卒"));
            board.cells[6][col] = Some(Piece::new(Side::Red, "兵"));
        }
        board
    }

    /// The piece at `coord`, if any.
    pub fn get(&self, coord: Coord) -> Option<&Piece> {
        self.cells[coord.row()][coord.col()].as_ref()
    }

    /// Places (or clears) a cell, returning what was there before.
    pub fn set(&mut self, coord: Coord, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.cells[coord.row()][coord.col()], piece)
    }

    /// Rows in order, each holding nine optional pieces.
    pub fn rows(&self) -> &[[Option<Piece>; COLS]; ROWS] {
        &self.cells
    }

    /// Occupied cells in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, &Piece)> {
        Coord::all().filter_map(|coord| self.get(coord).map(|piece| (coord, piece)))
    }

    /// Formats the board as text, one line per row.
    ///
    /// Red pieces are shown as `r<kind>`, black as `b<kind>`, empty cells as `.`.
    pub fn display(&self) -> String {
        let mut lines = Vec::with_capacity(ROWS);
        for (row, cells) in self.cells.iter().enumerate() {
            let rendered: Vec<String> = cells
                .iter()
                .map(|cell| match cell {
                    Some(piece) => format!("{}{}", piece.side().code(), piece.kind()),
                    None => ".".to_string(),
                })
                .collect();
            lines.push(format!("{} {}", row, rendered.join(" ")));
        }
        lines.join("\n")
    }
}

/// Authoritative game snapshot as returned by the rules engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    side_to_move: Side,
    is_over: bool,
    winner: Option<Side>,
}

impl GameState {
    /// Creates a snapshot.
    pub fn new(board: Board, side_to_move: Side, is_over: bool, winner: Option<Side>) -> Self {
        Self {
            board,
            side_to_move,
            is_over,
            winner,
        }
    }

    /// Standard opening position, red to move.
    pub fn opening() -> Self {
        Self::new(Board::standard(), Side::Red, false, None)
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side whose turn it is.
    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    /// Whether the game has ended.
    pub fn is_over(&self) -> bool {
        self.is_over
    }

    /// Winner, when the game has ended with one.
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }
}

/// A proposed move. Carries no legality judgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("{} -> {}", from, to)]
pub struct MoveRequest {
    /// Origin cell.
    pub from: Coord,
    /// Destination cell.
    pub to: Coord,
}

impl MoveRequest {
    /// Creates a move request.
    pub fn new(from: Coord, to: Coord) -> Self {
        Self { from, to }
    }
}
