//! Shared helpers for client tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use xiangqi_board::{Board, Coord, GameState, MoveRequest, Piece, Side};
use xiangqi_client::{ClientError, Request, RulesEngine};

/// Shorthand for a coordinate known to be on the board.
pub fn coord(row: usize, col: usize) -> Coord {
    Coord::new(row, col).expect("coordinate on board")
}

/// A state holding only the given pieces.
pub fn state_with(
    pieces: &[(usize, usize, Side, &str)],
    side_to_move: Side,
    is_over: bool,
    winner: Option<Side>,
) -> GameState {
    let mut board = Board::new();
    for &(row, col, side, kind) in pieces {
        board.set(coord(row, col), Some(Piece::new(side, kind)));
    }
    GameState::new(board, side_to_move, is_over, winner)
}

/// The opening position after red's general stepped from (9,4) to (8,4).
pub fn after_general_step() -> GameState {
    let mut board = Board::standard();
    let general = board.set(coord(9, 4), None);
    board.set(coord(8, 4), general);
    GameState::new(board, Side::Black, false, None)
}

/// Rules engine double that answers from a script and records every call.
#[derive(Default)]
pub struct ScriptedEngine {
    responses: Mutex<VecDeque<Result<GameState, ClientError>>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, state: GameState) {
        self.responses.lock().expect("lock").push_back(Ok(state));
    }

    pub fn push_err(&self, err: ClientError) {
        self.responses.lock().expect("lock").push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().expect("lock").clone()
    }

    fn answer(&self, request: Request) -> Result<GameState, ClientError> {
        self.requests.lock().expect("lock").push(request);
        self.responses
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::network("no scripted response")))
    }
}

#[async_trait]
impl RulesEngine for ScriptedEngine {
    async fn fetch_state(&self) -> Result<GameState, ClientError> {
        self.answer(Request::FetchState)
    }

    async fn request_move(&self, request: MoveRequest) -> Result<GameState, ClientError> {
        self.answer(Request::Move(request))
    }

    async fn reset(&self) -> Result<GameState, ClientError> {
        self.answer(Request::Reset)
    }
}
