//! Holds the authoritative state and republishes it to the grid.

use tracing::{debug, info, instrument};
use xiangqi_board::{GameState, Side};

use crate::engine::RulesEngine;
use crate::error::ClientError;
use crate::grid::BoardGrid;

/// Text shown by the turn indicator.
pub fn turn_label(state: &GameState) -> String {
    match (state.is_over(), state.winner()) {
        (true, Some(winner)) => format!("Game over: {} wins", winner),
        (true, None) => "Game over".to_string(),
        (false, _) => format!("{} to move", state.side_to_move()),
    }
}

/// Single source of truth for what the rules engine last said.
#[derive(Debug)]
pub struct StateSynchronizer {
    current: Option<GameState>,
    turn_indicator: String,
}

impl Default for StateSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl StateSynchronizer {
    /// Creates a synchronizer with no state yet.
    pub fn new() -> Self {
        Self {
            current: None,
            turn_indicator: "Connecting...".to_string(),
        }
    }

    /// Most recently applied state.
    pub fn current(&self) -> Option<&GameState> {
        self.current.as_ref()
    }

    /// Side to move, once a state has been applied.
    pub fn side_to_move(&self) -> Option<Side> {
        self.current.as_ref().map(GameState::side_to_move)
    }

    /// Whether the applied state is terminal.
    pub fn is_over(&self) -> bool {
        self.current.as_ref().is_some_and(GameState::is_over)
    }

    /// Current turn indicator text.
    pub fn turn_indicator(&self) -> &str {
        &self.turn_indicator
    }

    /// Retrieves the current state. Read-only on the server.
    #[instrument(skip_all)]
    pub async fn fetch_state(engine: &dyn RulesEngine) -> Result<GameState, ClientError> {
        debug!("Fetching authoritative state");
        engine.fetch_state().await
    }

    /// Replaces the held state wholesale, renders it and updates the turn indicator.
    #[instrument(skip_all, fields(side_to_move = %state.side_to_move(), is_over = state.is_over()))]
    pub fn apply_state(&mut self, state: GameState, grid: &mut BoardGrid) -> &GameState {
        grid.render(state.board());
        self.turn_indicator = turn_label(&state);
        info!(turn = %self.turn_indicator, "Applied authoritative state");
        self.current.insert(state)
    }
}
