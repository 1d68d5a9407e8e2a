//! The selection & move state machine.
//!
//! `Idle` → click own piece → `Armed(origin)` → click origin again → `Idle`,
//! or click anywhere else → move attempt → `Idle`. Destinations are never
//! filtered; the rules engine is the only judge of legality.

use derive_more::Display;
use tracing::{debug, instrument};
use xiangqi_board::{Coord, GameState, MoveRequest};

use crate::grid::BoardGrid;

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum SelectionState {
    /// Nothing selected.
    #[default]
    #[display("Idle")]
    Idle,
    /// One origin cell selected, awaiting a destination.
    #[display("Armed{}", _0)]
    Armed(Coord),
}

/// Why a click changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum IgnoreReason {
    /// No authoritative state has arrived yet.
    #[display("no state yet")]
    NoState,
    /// The game is over.
    #[display("game over")]
    GameOver,
    /// Idle click on an empty cell.
    #[display("empty cell")]
    EmptyCell,
    /// Idle click on a piece of the side not to move.
    #[display("opponent piece")]
    OpponentPiece,
    /// A move or reset is still waiting for the rules engine.
    #[display("request in flight")]
    RequestInFlight,
}

/// Result of feeding one click to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing happened.
    Ignored(IgnoreReason),
    /// The cell became the selected origin.
    Armed(Coord),
    /// The origin was clicked again and released.
    Disarmed(Coord),
    /// A move should be sent to the rules engine.
    MoveAttempt(MoveRequest),
}

/// Owns the selection. The grid only mirrors it.
#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    /// Creates an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Selected origin, if armed.
    pub fn selected(&self) -> Option<Coord> {
        match self.state {
            SelectionState::Idle => None,
            SelectionState::Armed(origin) => Some(origin),
        }
    }

    /// Interprets a click at `coord` against the current authoritative state.
    #[instrument(skip(self, game, grid), fields(state = %self.state))]
    pub fn on_click(
        &mut self,
        coord: Coord,
        game: Option<&GameState>,
        grid: &mut BoardGrid,
    ) -> ClickOutcome {
        let Some(game) = game else {
            return ClickOutcome::Ignored(IgnoreReason::NoState);
        };
        if game.is_over() {
            self.clear(grid);
            return ClickOutcome::Ignored(IgnoreReason::GameOver);
        }

        let outcome = match self.state {
            SelectionState::Idle => match game.board().get(coord) {
                None => ClickOutcome::Ignored(IgnoreReason::EmptyCell),
                Some(piece) if piece.side() != game.side_to_move() => {
                    ClickOutcome::Ignored(IgnoreReason::OpponentPiece)
                }
                Some(_) => {
                    self.state = SelectionState::Armed(coord);
                    grid.set_selected(coord, true);
                    ClickOutcome::Armed(coord)
                }
            },
            SelectionState::Armed(origin) if origin == coord => {
                self.clear(grid);
                ClickOutcome::Disarmed(origin)
            }
            SelectionState::Armed(origin) => {
                self.clear(grid);
                grid.clear_all_highlights();
                ClickOutcome::MoveAttempt(MoveRequest::new(origin, coord))
            }
        };
        debug!(?outcome, "Click handled");
        outcome
    }

    /// Drops any selection and its visual flag.
    pub fn clear(&mut self, grid: &mut BoardGrid) {
        if let SelectionState::Armed(origin) = self.state {
            grid.set_selected(origin, false);
            debug!(%origin, "Selection cleared");
        }
        self.state = SelectionState::Idle;
    }
}
