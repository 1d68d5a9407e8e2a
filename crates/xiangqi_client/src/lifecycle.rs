//! Game lifecycle: moves and resets against the rules engine, and the
//! game-over announcement.

use derive_new::new;
use tracing::{info, instrument};
use xiangqi_board::{GameState, MoveRequest, Side};

use crate::engine::RulesEngine;
use crate::error::ClientError;

/// Game-over notification for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct Announcement {
    winner: Option<Side>,
}

impl Announcement {
    /// The winning side, if the engine named one.
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Message shown to the user.
    pub fn message(&self) -> String {
        match self.winner {
            Some(side) => format!("Game over! {} wins!", side),
            None => "Game over!".to_string(),
        }
    }
}

/// Tracks whether the current terminal state has been announced.
#[derive(Debug, Default)]
pub struct LifecycleController {
    announced: bool,
}

impl LifecycleController {
    /// Creates a controller that has announced nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the current terminal state has already been announced.
    pub fn announced(&self) -> bool {
        self.announced
    }

    /// Sends a move to the rules engine.
    #[instrument(skip(engine), fields(request = %request))]
    pub async fn request_move(
        engine: &dyn RulesEngine,
        request: MoveRequest,
    ) -> Result<GameState, ClientError> {
        engine.request_move(request).await
    }

    /// Asks the rules engine for a fresh game.
    #[instrument(skip(engine))]
    pub async fn reset(engine: &dyn RulesEngine) -> Result<GameState, ClientError> {
        engine.reset().await
    }

    /// Returns an announcement on each transition into a terminal state.
    ///
    /// Re-rendering the same terminal state yields nothing; a non-terminal
    /// state re-arms the controller for the next game.
    #[instrument(skip_all, fields(is_over = state.is_over(), announced = self.announced))]
    pub fn check_terminal(&mut self, state: &GameState) -> Option<Announcement> {
        if !state.is_over() {
            self.announced = false;
            return None;
        }
        if self.announced {
            return None;
        }
        self.announced = true;
        let announcement = Announcement::new(state.winner());
        info!(message = %announcement.message(), "Game over");
        Some(announcement)
    }
}
