//! The game context: grid, synchronizer and both controllers, owned together.
//!
//! The context never performs I/O. Operations that need the rules engine hand
//! back a [`Dispatch`]; whoever runs it returns the result as a
//! [`Completion`]. Every dispatch carries a sequence number, and a completion
//! is applied only when it is newer than the last applied one and not older
//! than the latest reset. Board clicks are inert while a move or reset is in
//! flight, so at most one mutating request is outstanding at a time (a reset
//! supersedes a pending move).

use derive_more::Display;
use tracing::{debug, error, info, instrument, warn};
use xiangqi_board::{Coord, GameState, MoveRequest};

use crate::engine::RulesEngine;
use crate::error::{ClientError, ClientErrorKind};
use crate::grid::BoardGrid;
use crate::lifecycle::{Announcement, LifecycleController};
use crate::selection::{ClickOutcome, IgnoreReason, SelectionController, SelectionState};
use crate::sync::StateSynchronizer;

/// A call to the rules engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Request {
    /// Read the current state.
    #[display("fetch state")]
    FetchState,
    /// Submit a move.
    #[display("move {}", _0)]
    Move(MoveRequest),
    /// Start a new game.
    #[display("reset")]
    Reset,
}

impl Request {
    /// Performs the call.
    pub async fn execute(self, engine: &dyn RulesEngine) -> Result<GameState, ClientError> {
        match self {
            Request::FetchState => StateSynchronizer::fetch_state(engine).await,
            Request::Move(request) => LifecycleController::request_move(engine, request).await,
            Request::Reset => LifecycleController::reset(engine).await,
        }
    }

    fn is_mutating(self) -> bool {
        !matches!(self, Request::FetchState)
    }
}

/// A request stamped with its sequence number, ready to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    /// Sequence number.
    pub seq: u64,
    /// The call to make.
    pub request: Request,
}

impl Dispatch {
    /// Runs the request and packages the result.
    pub async fn run(self, engine: &dyn RulesEngine) -> Completion {
        let result = self.request.execute(engine).await;
        Completion {
            seq: self.seq,
            request: self.request,
            result,
        }
    }
}

/// The result of a dispatched request.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Sequence number of the originating dispatch.
    pub seq: u64,
    /// The call that was made.
    pub request: Request,
    /// What the rules engine answered.
    pub result: Result<GameState, ClientError>,
}

/// Orders responses against the requests that caused them.
#[derive(Debug, Default)]
struct Sequencer {
    issued: u64,
    last_applied: u64,
    reset_floor: u64,
}

impl Sequencer {
    fn issue(&mut self, request: Request) -> u64 {
        self.issued += 1;
        if request == Request::Reset {
            self.reset_floor = self.issued;
        }
        self.issued
    }

    fn is_current(&self, seq: u64) -> bool {
        seq > self.last_applied && seq >= self.reset_floor
    }

    fn mark_applied(&mut self, seq: u64) {
        self.last_applied = seq;
    }
}

/// Explicit context for one game, owned by the application.
#[derive(Debug)]
pub struct GameContext {
    grid: BoardGrid,
    sync: StateSynchronizer,
    selection: SelectionController,
    lifecycle: LifecycleController,
    sequencer: Sequencer,
    in_flight: Option<u64>,
    notice: Option<String>,
}

impl Default for GameContext {
    fn default() -> Self {
        Self::new()
    }
}

impl GameContext {
    /// Creates a context with a built grid and no state yet.
    #[instrument]
    pub fn new() -> Self {
        let mut grid = BoardGrid::new();
        grid.build();
        Self {
            grid,
            sync: StateSynchronizer::new(),
            selection: SelectionController::new(),
            lifecycle: LifecycleController::new(),
            sequencer: Sequencer::default(),
            in_flight: None,
            notice: None,
        }
    }

    /// The display surface.
    pub fn grid(&self) -> &BoardGrid {
        &self.grid
    }

    /// The display surface, for layout.
    pub fn grid_mut(&mut self) -> &mut BoardGrid {
        &mut self.grid
    }

    /// The last applied authoritative state.
    pub fn state(&self) -> Option<&GameState> {
        self.sync.current()
    }

    /// Selection controller state.
    pub fn selection(&self) -> SelectionState {
        self.selection.state()
    }

    /// Turn indicator text.
    pub fn turn_indicator(&self) -> &str {
        self.sync.turn_indicator()
    }

    /// Latest status notice (rejections, failures).
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Whether a move or reset is awaiting its response.
    pub fn request_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    fn dispatch(&mut self, request: Request) -> Dispatch {
        let seq = self.sequencer.issue(request);
        if request.is_mutating() {
            self.in_flight = Some(seq);
        }
        debug!(seq, %request, "Dispatching request");
        Dispatch { seq, request }
    }

    /// Starts the initial state fetch.
    pub fn fetch_state(&mut self) -> Dispatch {
        self.dispatch(Request::FetchState)
    }

    /// Starts a reset. Any selection is dropped immediately.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Dispatch {
        self.selection.clear(&mut self.grid);
        self.notice = None;
        info!("Reset requested");
        self.dispatch(Request::Reset)
    }

    /// Handles a click on a board cell. Returns a dispatch when the click
    /// produced a move attempt.
    #[instrument(skip(self), fields(row = coord.row(), col = coord.col()))]
    pub fn click(&mut self, coord: Coord) -> Option<Dispatch> {
        if let Some(seq) = self.in_flight {
            debug!(seq, reason = %IgnoreReason::RequestInFlight, "Click ignored");
            return None;
        }
        match self.selection.on_click(coord, self.sync.current(), &mut self.grid) {
            ClickOutcome::MoveAttempt(request) => {
                self.notice = None;
                info!(%request, "Move attempt");
                Some(self.dispatch(Request::Move(request)))
            }
            ClickOutcome::Ignored(reason) => {
                debug!(%reason, "Click ignored");
                None
            }
            ClickOutcome::Armed(_) | ClickOutcome::Disarmed(_) => None,
        }
    }

    /// Applies the result of a dispatched request.
    ///
    /// Returns an announcement when the applied state newly ends the game.
    #[instrument(skip(self, completion), fields(seq = completion.seq, request = %completion.request))]
    pub fn complete(&mut self, completion: Completion) -> Option<Announcement> {
        if self.in_flight == Some(completion.seq) {
            self.in_flight = None;
        }
        if !self.sequencer.is_current(completion.seq) {
            debug!("Discarding stale response");
            return None;
        }

        match completion.result {
            Ok(state) => {
                self.sequencer.mark_applied(completion.seq);
                if completion.request == Request::Reset {
                    self.selection.clear(&mut self.grid);
                }
                self.notice = None;
                self.apply_state(state)
            }
            Err(err) => {
                self.notice = Some(match err.kind {
                    ClientErrorKind::InvalidMove => {
                        info!(error = %err, "Move rejected, board unchanged");
                        "Move rejected".to_string()
                    }
                    ClientErrorKind::NetworkFailure => {
                        warn!(error = %err, "Request failed, keeping previous state");
                        format!("Could not reach the server ({})", completion.request)
                    }
                    ClientErrorKind::MalformedState => {
                        error!(error = %err, "Server sent a malformed state, ignoring it");
                        "Server sent an unreadable state".to_string()
                    }
                });
                None
            }
        }
    }

    /// Replaces the authoritative state, re-renders and checks for game over.
    #[instrument(skip_all)]
    pub fn apply_state(&mut self, state: GameState) -> Option<Announcement> {
        let state = self.sync.apply_state(state, &mut self.grid);
        if state.is_over() {
            self.selection.clear(&mut self.grid);
        }
        self.lifecycle.check_terminal(state)
    }

    /// Whether an announcement is still relevant (the game is still over).
    pub fn announcement_current(&self) -> bool {
        self.sync.is_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequencer_discards_older_than_applied() {
        let mut seq = Sequencer::default();
        let fetch = seq.issue(Request::FetchState);
        let first = seq.issue(Request::FetchState);
        assert!(seq.is_current(first));
        seq.mark_applied(first);
        assert!(!seq.is_current(fetch));
    }

    #[test]
    fn test_sequencer_reset_floor() {
        let mut seq = Sequencer::default();
        let request = MoveRequest::new(Coord::new(9, 4).unwrap(), Coord::new(6, 4).unwrap());
        let mv = seq.issue(Request::Move(request));
        let reset = seq.issue(Request::Reset);
        assert!(!seq.is_current(mv));
        assert!(seq.is_current(reset));
    }
}
