// ── Transport error types ──
//
// Everything that can go wrong at the network boundary. Consumers of
// this crate see these; they never see raw tungstenite or reqwest
// errors directly.

use thiserror::Error;

/// Unified error type for the transport crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("WebSocket connection failed: {0}")]
    WebSocketConnect(String),

    #[error("discovery request to {url} failed: {reason}")]
    Discovery { url: String, reason: String },

    #[error("discovery endpoint returned no streams")]
    NoStreams,

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to decode response body: {0}")]
    Deserialization(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(ToString::to_string)
            .unwrap_or_else(|| "<unknown>".into());
        Self::Discovery {
            url,
            reason: err.to_string(),
        }
    }
}
