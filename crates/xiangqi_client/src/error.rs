//! Client error types.

use derive_more::{Display, Error};
use tracing::{error, instrument};
use xiangqi_board::WireError;

/// What went wrong with a call to the rules engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ClientErrorKind {
    /// The request could not complete (transport failure or non-success status).
    #[display("network failure")]
    NetworkFailure,
    /// The rules engine rejected a proposed move.
    #[display("invalid move")]
    InvalidMove,
    /// The rules engine answered with a state that cannot be rendered.
    #[display("malformed state")]
    MalformedState,
}

/// Client error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Client error ({}): {} at {}:{}", kind, message, file, line)]
pub struct ClientError {
    /// Error category.
    pub kind: ClientErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ClientError {
    /// Creates a new client error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// A request that could not complete.
    #[track_caller]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::NetworkFailure, message)
    }

    /// A move the rules engine refused.
    #[track_caller]
    pub fn invalid_move(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::InvalidMove, message)
    }

    /// A state that failed validation.
    #[track_caller]
    pub fn malformed(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(error_message = %message, "Malformed state from rules engine");
        Self::new(ClientErrorKind::MalformedState, message)
    }
}

impl From<reqwest::Error> for ClientError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::network(format!("HTTP request failed: {}", err))
    }
}

impl From<WireError> for ClientError {
    #[track_caller]
    fn from(err: WireError) -> Self {
        Self::malformed(err.message)
    }
}
