//! Xiangqi board types shared by the thin client and its test doubles.
//!
//! The rules engine is authoritative: nothing in this crate validates moves.
//! It only describes what the engine sends back and decodes it once, at the
//! wire boundary, into tagged values.
//!
//! # Example
//!
//! ```
//! use xiangqi_board::{Coord, GameState, Side};
//!
//! let state = GameState::opening();
//! let general = state.board().get(Coord::new(9, 4).unwrap()).unwrap();
//! assert_eq!(general.side(), Side::Red);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod types;
mod wire;

pub use types::{Board, COLS, Coord, GameState, MoveRequest, Piece, ROWS, Side};
pub use wire::{WireError, WireGameState, WireMove, decode_state};
