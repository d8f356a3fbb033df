//! Wire envelope for inbound backend frames.
//!
//! Every frame from the inference backend is a JSON object of the shape
//! `{ "type": "<kind>", "payload": { ... }, "timestamp": <epoch-ms> }`.
//! The payload shape depends on the kind, so it stays a raw
//! [`serde_json::Value`] here -- typed decoding happens in the consumer,
//! which knows what each kind is supposed to carry and can drop frames
//! that do not match without tearing down the link.

use serde::Deserialize;

// ── Known message kinds ──────────────────────────────────────────────

pub const KIND_PERSON_DETECTED: &str = "person_detected";
pub const KIND_FALL_DETECTED: &str = "fall_detected";
pub const KIND_LOITER_ALERT: &str = "loiter_alert";
pub const KIND_CROWD_ALERT: &str = "crowd_alert";
pub const KIND_ZONE_UPDATE: &str = "zone_update";

// ── WireMessage ──────────────────────────────────────────────────────

/// One decoded frame from the event stream.
///
/// `kind` is deliberately left as a string: unknown kinds must flow to
/// the dispatcher (which logs and drops them) rather than failing the
/// parse, so a newer backend never kills an older dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub payload: serde_json::Value,

    /// Epoch milliseconds, as sent by the backend.
    #[serde(default)]
    pub timestamp: i64,
}

/// Parse a raw text frame into a [`WireMessage`].
///
/// Returns `None` for anything that is not a JSON object with a string
/// `type` field. Garbled frames are a fact of life on a lossy link and
/// must never propagate past this boundary.
pub fn parse_frame(text: &str) -> Option<WireMessage> {
    match serde_json::from_str::<WireMessage>(text) {
        Ok(msg) => Some(msg),
        Err(e) => {
            tracing::debug!(error = %e, "dropping unparseable frame");
            None
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
