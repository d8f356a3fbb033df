//! WebSocket event link with auto-reconnect.
//!
//! Connects to the inference backend's event endpoint and fans parsed
//! [`WireMessage`] frames out through a [`tokio::sync::broadcast`]
//! channel. Link state transitions (`disconnected -> connecting ->
//! connected -> reconnecting ...`) are observable through a `watch`
//! channel.
//!
//! Reconnection is a fixed-interval retry (default 3000 ms), not an
//! exponential backoff: the backend is a single edge device on the local
//! network, and a constant cadence keeps worst-case reconnection latency
//! bounded and predictable.
//!
//! # Example
//!
//! ```rust,ignore
//! use sightline_api::websocket::{ReconnectConfig, WsLink};
//! use tokio_util::sync::CancellationToken;
//! use url::Url;
//!
//! let cancel = CancellationToken::new();
//! let url = Url::parse("ws://localhost:3851/ws")?;
//!
//! let link = WsLink::connect(url, ReconnectConfig::default(), cancel.clone());
//! let mut rx = link.subscribe();
//!
//! while let Ok(msg) = rx.recv().await {
//!     println!("{}: {}", msg.kind, msg.payload);
//! }
//!
//! link.shutdown();
//! ```

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::{broadcast, watch};
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;
use crate::wire::{self, WireMessage};

// ── Broadcast channel capacity ───────────────────────────────────────

const FRAME_CHANNEL_CAPACITY: usize = 1024;

// ── LinkState ────────────────────────────────────────────────────────

/// Observable connection state of the event link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Reconnecting {
        attempt: u32,
    },
}

impl LinkState {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

// ── ReconnectConfig ──────────────────────────────────────────────────

/// Retry configuration for the event link.
///
/// Fixed-interval: every failed or dropped connection waits exactly
/// `retry_delay` before the next attempt. There is no cap on attempts.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay between reconnection attempts. Default: 3000 ms.
    pub retry_delay: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            retry_delay: Duration::from_millis(3000),
        }
    }
}

// ── WsLink ───────────────────────────────────────────────────────────

/// Handle to a running event link.
///
/// Drop all receivers and call [`shutdown`](Self::shutdown) to tear down
/// the background task. `shutdown` is idempotent; a cancelled link never
/// fires another retry.
pub struct WsLink {
    frame_rx: broadcast::Receiver<Arc<WireMessage>>,
    state_rx: watch::Receiver<LinkState>,
    cancel: CancellationToken,
}

impl WsLink {
    /// Spawn the reconnection loop against `url`.
    ///
    /// Returns immediately; the first connection attempt happens on the
    /// background task. Subscribe to the frame receiver to start
    /// consuming messages.
    pub fn connect(url: Url, reconnect: ReconnectConfig, cancel: CancellationToken) -> Self {
        let (frame_tx, frame_rx) = broadcast::channel(FRAME_CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(LinkState::Disconnected);

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            link_loop(url, frame_tx, state_tx, reconnect, task_cancel).await;
        });

        Self {
            frame_rx,
            state_rx,
            cancel,
        }
    }

    /// Get a new broadcast receiver for the frame stream.
    ///
    /// Multiple consumers can subscribe concurrently. A consumer that
    /// falls behind receives [`broadcast::error::RecvError::Lagged`].
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<WireMessage>> {
        self.frame_rx.resubscribe()
    }

    /// Subscribe to link state transitions.
    pub fn state(&self) -> watch::Receiver<LinkState> {
        self.state_rx.clone()
    }

    /// Current link state.
    pub fn current_state(&self) -> LinkState {
        self.state_rx.borrow().clone()
    }

    /// Signal the background task to shut down. Safe to call twice.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

// ── Background reconnection loop ─────────────────────────────────────

/// Main loop: connect -> read until drop -> fixed-delay sleep -> repeat.
async fn link_loop(
    url: Url,
    frame_tx: broadcast::Sender<Arc<WireMessage>>,
    state_tx: watch::Sender<LinkState>,
    reconnect: ReconnectConfig,
    cancel: CancellationToken,
) {
    let mut attempt: u32 = 0;

    loop {
        let _ = state_tx.send(if attempt == 0 {
            LinkState::Connecting
        } else {
            LinkState::Reconnecting { attempt }
        });

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = connect_and_read(&url, &frame_tx, &state_tx, &cancel) => {
                match result {
                    Ok(()) => {
                        tracing::info!("event link closed, scheduling reconnect");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, attempt, "event link error");
                    }
                }
            }
        }

        let _ = state_tx.send(LinkState::Disconnected);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(reconnect.retry_delay) => {}
        }

        attempt += 1;
    }

    let _ = state_tx.send(LinkState::Disconnected);
    tracing::debug!("event link loop exiting");
}

// ── Single connection lifecycle ──────────────────────────────────────

/// Establish one WebSocket connection and read frames until it drops.
async fn connect_and_read(
    url: &Url,
    frame_tx: &broadcast::Sender<Arc<WireMessage>>,
    state_tx: &watch::Sender<LinkState>,
    cancel: &CancellationToken,
) -> Result<(), Error> {
    tracing::info!(url = %url, "connecting to event link");

    let (ws_stream, _response) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .map_err(|e| Error::WebSocketConnect(e.to_string()))?;

    tracing::info!("event link connected");
    let _ = state_tx.send(LinkState::Connected);

    let (_write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            frame = read.next() => {
                match frame {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        if let Some(msg) = wire::parse_frame(&text) {
                            // Send errors just mean no active subscribers.
                            let _ = frame_tx.send(Arc::new(msg));
                        }
                    }
                    Some(Ok(tungstenite::Message::Ping(_))) => {
                        // tungstenite replies with pong automatically
                        tracing::trace!("event link ping");
                    }
                    Some(Ok(tungstenite::Message::Close(frame))) => {
                        if let Some(ref cf) = frame {
                            tracing::info!(
                                code = %cf.code,
                                reason = %cf.reason,
                                "event link close frame received"
                            );
                        } else {
                            tracing::info!("event link close frame received (no payload)");
                        }
                        return Ok(());
                    }
                    Some(Err(e)) => {
                        return Err(Error::WebSocketConnect(e.to_string()));
                    }
                    None => {
                        // Stream ended without a close frame
                        tracing::info!("event link stream ended");
                        return Ok(());
                    }
                    _ => {
                        // Binary, Pong, Frame -- ignore
                    }
                }
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_reconnect_config_is_three_seconds() {
        let config = ReconnectConfig::default();
        assert_eq!(config.retry_delay, Duration::from_millis(3000));
    }

    #[test]
    fn default_link_state_is_disconnected() {
        assert_eq!(LinkState::default(), LinkState::Disconnected);
        assert!(!LinkState::Disconnected.is_connected());
        assert!(LinkState::Connected.is_connected());
        assert!(!LinkState::Reconnecting { attempt: 2 }.is_connected());
    }

    #[tokio::test]
    async fn shutdown_is_idempotent_and_settles_disconnected() {
        let cancel = CancellationToken::new();
        let url = Url::parse("ws://127.0.0.1:1/ws").unwrap();
        let link = WsLink::connect(url, ReconnectConfig::default(), cancel);

        link.shutdown();
        link.shutdown();

        // Once the background task exits it drops its state sender; the
        // last value it published is the settled one.
        let mut state = link.state();
        tokio::time::timeout(Duration::from_secs(2), async {
            while state.changed().await.is_ok() {}
        })
        .await
        .expect("link task should exit promptly after shutdown");

        assert_eq!(*state.borrow(), LinkState::Disconnected);
        assert_eq!(link.current_state(), LinkState::Disconnected);
    }
}
