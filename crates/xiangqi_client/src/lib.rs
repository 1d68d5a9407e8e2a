//! Xiangqi thin client - terminal front end for a server-authoritative game.
//!
//! The rules engine decides everything. This crate only keeps the last state
//! it was sent, lets the player pick an origin and a destination, forwards
//! the proposed move, and renders whatever comes back.
//!
//! # Architecture
//!
//! - **Grid**: the 10x9 display surface with selection/highlight flags
//! - **Synchronizer**: holds the authoritative [`GameState`] and republishes it
//! - **Selection**: the `Idle` / `Armed(origin)` click state machine
//! - **Lifecycle**: moves, resets and the game-over announcement
//! - **Context**: owns all of the above and orders responses by sequence number
//! - **Driver**: runs rules-engine calls off the event loop
//!
//! # Example
//!
//! ```
//! use xiangqi_client::GameContext;
//! use xiangqi_board::{Coord, GameState};
//!
//! let mut context = GameContext::new();
//! context.apply_state(GameState::opening());
//!
//! let general = Coord::new(9, 4).unwrap();
//! assert!(context.click(general).is_none()); // armed
//! assert!(context.click(general).is_none()); // released, nothing sent
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod context;
mod driver;
mod engine;
mod error;
mod grid;
mod lifecycle;
mod selection;
mod sync;
pub mod tui;

// Crate-level exports - Configuration
pub use config::{ClientConfig, ConfigError, SERVER_URL_ENV};

// Crate-level exports - Errors
pub use error::{ClientError, ClientErrorKind};

// Crate-level exports - Rules engine access
pub use engine::{HttpRulesEngine, RulesEngine};

// Crate-level exports - Board grid
pub use grid::{BoardGrid, CELL_HEIGHT, CELL_WIDTH, Cell, GRID_HEIGHT, GRID_WIDTH, Glyph};

// Crate-level exports - Controllers
pub use lifecycle::{Announcement, LifecycleController};
pub use selection::{ClickOutcome, IgnoreReason, SelectionController, SelectionState};
pub use sync::{StateSynchronizer, turn_label};

// Crate-level exports - Context and driver
pub use context::{Completion, Dispatch, GameContext, Request};
pub use driver::{ClientEvent, Driver};

pub use xiangqi_board::GameState;
