//! Camera discovery HTTP client.
//!
//! The streaming gateway exposes its registered streams at
//! `GET {base}/api/streams` (a JSON object keyed by stream id) and a
//! per-stream still frame at `GET {base}/api/frame.jpeg?src={id}`.
//! Discovery failures are surfaced as explicit errors: they block a
//! deliberate camera-setup action, so unlike a garbled stream frame they
//! must not be silently swallowed.

use std::time::Duration;

use url::Url;

use crate::error::Error;

/// Cadence at which consumers should re-fetch thumbnail frames.
pub const THUMBNAIL_REFRESH: Duration = Duration::from_secs(10);

/// Cadence for the full-size preview of a single stream.
pub const PREVIEW_REFRESH: Duration = Duration::from_secs(2);

/// HTTP client for the stream gateway's discovery endpoints.
pub struct DiscoveryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DiscoveryClient {
    /// Create a client against a gateway base URL
    /// (e.g. `http://localhost:1984`).
    pub fn new(base_url: Url) -> Self {
        Self::from_reqwest(base_url, reqwest::Client::new())
    }

    /// Create a client reusing a pre-built `reqwest::Client`.
    pub fn from_reqwest(base_url: Url, http: reqwest::Client) -> Self {
        Self { http, base_url }
    }

    /// The gateway base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List the stream identifiers the gateway currently knows about.
    ///
    /// An unreachable gateway maps to [`Error::Discovery`]; a reachable
    /// gateway with zero registered streams maps to [`Error::NoStreams`].
    pub async fn list_streams(&self) -> Result<Vec<String>, Error> {
        let url = self.api_url("streams")?;
        tracing::debug!(url = %url, "discovering streams");

        let response = self.http.get(url).send().await?.error_for_status()?;
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Deserialization(e.to_string()))?;

        let streams = body
            .as_object()
            .ok_or_else(|| Error::Deserialization("expected a JSON object of streams".into()))?;

        if streams.is_empty() {
            return Err(Error::NoStreams);
        }

        Ok(streams.keys().cloned().collect())
    }

    /// Synthesize the still-frame URL for one stream:
    /// `{base}/api/frame.jpeg?src={id}`.
    pub fn frame_url(&self, stream_id: &str) -> Result<Url, Error> {
        let mut url = self.api_url("frame.jpeg")?;
        url.query_pairs_mut().append_pair("src", stream_id);
        Ok(url)
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{path}`, tolerating a trailing slash on the base.
    fn api_url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/api/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        );
        Url::parse(&full).map_err(Error::from)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
