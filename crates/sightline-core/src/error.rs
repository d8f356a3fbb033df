// ── Core error types ──
//
// User-facing errors from sightline-core. Consumers never see raw
// transport errors; the `From<sightline_api::Error>` impl translates
// them into domain-appropriate variants at the boundary.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Cannot reach inference backend: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Camera discovery failed: {reason}")]
    DiscoveryFailed { reason: String },

    /// The gateway answered but has zero registered streams. Distinct
    /// from an unreachable gateway: the user's setup action needs a
    /// different remedy.
    #[error("Discovery endpoint returned no streams")]
    NoStreamsFound,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sightline_api::Error> for CoreError {
    fn from(err: sightline_api::Error) -> Self {
        match err {
            sightline_api::Error::WebSocketConnect(reason) => Self::ConnectionFailed { reason },
            sightline_api::Error::Discovery { url, reason } => Self::DiscoveryFailed {
                reason: format!("{url}: {reason}"),
            },
            sightline_api::Error::NoStreams => Self::NoStreamsFound,
            sightline_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("invalid URL: {e}"),
            },
            sightline_api::Error::Deserialization(message) => {
                Self::Internal(format!("deserialization error: {message}"))
            }
        }
    }
}
