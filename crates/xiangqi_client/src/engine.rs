//! Rules engine access over HTTP.

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};
use xiangqi_board::{GameState, MoveRequest, WireGameState, WireMove};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// The authoritative rules engine.
///
/// Every call returns a complete [`GameState`]; the client never derives one
/// on its own.
#[async_trait]
pub trait RulesEngine: Send + Sync {
    /// Current snapshot. No side effects on the server.
    async fn fetch_state(&self) -> Result<GameState, ClientError>;

    /// Submits a move. A refusal for any reason is
    /// [`ClientErrorKind::InvalidMove`](crate::ClientErrorKind::InvalidMove).
    async fn request_move(&self, request: MoveRequest) -> Result<GameState, ClientError>;

    /// Reinitializes the server-side game and returns the fresh state.
    async fn reset(&self) -> Result<GameState, ClientError>;
}

/// Rules engine reached through its REST API.
#[derive(Debug, Clone)]
pub struct HttpRulesEngine {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRulesEngine {
    /// Creates a client with default transport settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Creates a client honouring the configured URL and timeout.
    #[instrument(skip(config), fields(server_url = %config.server_url()))]
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            debug!(?timeout, "Applying request timeout");
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url: config.server_url().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/game/{}", self.base_url, path)
    }

    /// Reads a successful response body as a game state.
    async fn decode(response: reqwest::Response) -> Result<GameState, ClientError> {
        let text = response.text().await?;
        debug!(body_len = text.len(), "Decoding game state");
        let wire: WireGameState = serde_json::from_str(&text)
            .map_err(|e| ClientError::malformed(format!("Invalid game state JSON: {}", e)))?;
        Ok(GameState::try_from(wire)?)
    }

    /// Fails with a network error on a non-success status.
    async fn expect_success(
        response: reqwest::Response,
        what: &str,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %body.trim(), what, "Rules engine returned an error");
        Err(ClientError::network(format!("{} failed: HTTP {}", what, status)))
    }
}

#[async_trait]
impl RulesEngine for HttpRulesEngine {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_state(&self) -> Result<GameState, ClientError> {
        debug!("Getting game state via REST");
        let response = self.client.get(self.url("state")).send().await?;
        let response = Self::expect_success(response, "Fetch state").await?;
        let state = Self::decode(response).await?;
        debug!(side_to_move = %state.side_to_move(), is_over = state.is_over(), "Got game state");
        Ok(state)
    }

    #[instrument(skip(self), fields(base_url = %self.base_url, request = %request))]
    async fn request_move(&self, request: MoveRequest) -> Result<GameState, ClientError> {
        info!("Submitting move");
        let body = WireMove::from(request);
        let response = self
            .client
            .post(self.url("move"))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            info!(status = %status, reason = %reason.trim(), "Move rejected");
            return Err(ClientError::invalid_move(format!(
                "HTTP {}: {}",
                status,
                reason.trim()
            )));
        }

        let state = Self::decode(response).await?;
        info!(side_to_move = %state.side_to_move(), "Move accepted");
        Ok(state)
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn reset(&self) -> Result<GameState, ClientError> {
        info!("Resetting game");
        let response = self.client.get(self.url("reset")).send().await?;
        let response = Self::expect_success(response, "Reset").await?;
        Self::decode(response).await
    }
}
