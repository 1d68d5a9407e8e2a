//! JSON shapes spoken by the rules engine, and their decoding.
//!
//! Decoding is strict about structure (ten rows of nine cells, known side
//! codes, well-formed pieces) and lenient about the two ways an absent value
//! shows up on the wire: `null` and the empty string.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::types::{Board, COLS, Coord, GameState, MoveRequest, Piece, ROWS, Side};

/// Game state exactly as serialized by the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGameState {
    /// Ten rows of nine cells; each cell is `"<side>-<kind>"`, `null` or `""`.
    pub board: Vec<Vec<Option<String>>>,
    /// `"r"` or `"b"`.
    pub current_turn: String,
    /// Terminal flag.
    pub game_over: bool,
    /// `"r"`, `"b"`, `""` or absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

/// Move request body: X is the row, Y the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMove {
    /// Origin row.
    pub from_x: i64,
    /// Origin column.
    pub from_y: i64,
    /// Destination row.
    pub to_x: i64,
    /// Destination column.
    pub to_y: i64,
}

/// Malformed wire data.
#[derive(Debug, Clone, Display, Error)]
#[display("Wire error: {} at {}:{}", message, file, line)]
pub struct WireError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl WireError {
    /// Creates a new wire error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<serde_json::Error> for WireError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {}", err))
    }
}

/// Parses and validates a JSON game state.
#[instrument(skip(json), fields(len = json.len()))]
pub fn decode_state(json: &str) -> Result<GameState, WireError> {
    let wire: WireGameState = serde_json::from_str(json)?;
    GameState::try_from(wire)
}

fn absent(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

impl TryFrom<WireGameState> for GameState {
    type Error = WireError;

    fn try_from(wire: WireGameState) -> Result<Self, Self::Error> {
        if wire.board.len() != ROWS {
            return Err(WireError::new(format!(
                "Board has {} rows, expected {}",
                wire.board.len(),
                ROWS
            )));
        }

        let mut board = Board::new();
        for (row, cells) in wire.board.iter().enumerate() {
            if cells.len() != COLS {
                return Err(WireError::new(format!(
                    "Row {} has {} cells, expected {}",
                    row,
                    cells.len(),
                    COLS
                )));
            }
            for (col, cell) in cells.iter().enumerate() {
                if absent(cell) {
                    continue;
                }
                let piece: Piece = cell.as_deref().unwrap_or_default().parse()?;
                if let Some(coord) = Coord::new(row, col) {
                    board.set(coord, Some(piece));
                }
            }
        }

        let side_to_move = Side::from_code(&wire.current_turn).ok_or_else(|| {
            WireError::new(format!("Unknown currentTurn '{}'", wire.current_turn))
        })?;

        let winner = if absent(&wire.winner) {
            None
        } else {
            let code = wire.winner.as_deref().unwrap_or_default();
            Some(
                Side::from_code(code)
                    .ok_or_else(|| WireError::new(format!("Unknown winner '{}'", code)))?,
            )
        };

        debug!(
            side_to_move = %side_to_move,
            game_over = wire.game_over,
            winner = ?winner,
            "Decoded game state"
        );
        Ok(GameState::new(board, side_to_move, wire.game_over, winner))
    }
}

impl From<&GameState> for WireGameState {
    fn from(state: &GameState) -> Self {
        let board = state
            .board()
            .rows()
            .iter()
            .map(|row| row.iter().map(|cell| cell.as_ref().map(Piece::encode)).collect())
            .collect();
        Self {
            board,
            current_turn: state.side_to_move().code().to_string(),
            game_over: state.is_over(),
            winner: state.winner().map(|side| side.code().to_string()),
        }
    }
}

impl From<MoveRequest> for WireMove {
    fn from(request: MoveRequest) -> Self {
        Self {
            from_x: request.from.row() as i64,
            from_y: request.from.col() as i64,
            to_x: request.to.row() as i64,
            to_y: request.to.col() as i64,
        }
    }
}

impl TryFrom<WireMove> for MoveRequest {
    type Error = WireError;

    fn try_from(wire: WireMove) -> Result<Self, Self::Error> {
        let coord = |x: i64, y: i64| {
            usize::try_from(x)
                .ok()
                .zip(usize::try_from(y).ok())
                .and_then(|(row, col)| Coord::new(row, col))
                .ok_or_else(|| WireError::new(format!("({}, {}) is off the board", x, y)))
        };
        Ok(MoveRequest::new(
            coord(wire.from_x, wire.from_y)?,
            coord(wire.to_x, wire.to_y)?,
        ))
    }
}
