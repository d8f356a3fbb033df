//! Transport layer for the Sightline monitoring dashboard.
//!
//! Two network boundaries live here, and nothing else:
//!
//! - **[`websocket`]** — the long-lived event link to the inference
//!   backend. [`WsLink`] owns one connection at a time, reconnects on a
//!   fixed 3-second cadence, and fans lenient-parsed [`WireMessage`]
//!   frames out over a broadcast channel. Link state is observable via a
//!   `watch` channel.
//! - **[`discovery`]** — the camera-discovery HTTP client against the
//!   stream gateway (`/api/streams`, `/api/frame.jpeg?src=`).
//!
//! Typed interpretation of frame payloads is deliberately *not* done
//! here: payload shapes depend on the message kind, and the consumer is
//! the layer that knows how to drop a malformed payload without killing
//! the link.

pub mod discovery;
pub mod error;
pub mod websocket;
pub mod wire;

pub use discovery::DiscoveryClient;
pub use error::Error;
pub use websocket::{LinkState, ReconnectConfig, WsLink};
pub use wire::WireMessage;
