//! State-reconciliation core for the Sightline monitoring dashboard.
//!
//! One authoritative store ingests a live, unordered, partially-reliable
//! event stream (or a synthetic stand-in) and derives consistent,
//! bounded, UI-consumable state. The pieces:
//!
//! - **[`Dashboard`]** — the engine facade. Constructed once per
//!   session; owns the producer slot ([`DataSource`] live/mock), the
//!   rotation scheduler, and the staleness sweeper. Switching producers
//!   is teardown-then-setup, so the two can never feed the store at the
//!   same time.
//!
//! - **[`DashboardStore`]** — the single source of truth. Entity
//!   collections (cameras, zones, people), the bounded alert ledger,
//!   wholesale-replaced aggregates, per-camera heatmaps, UI flags, the
//!   AI-model catalog, and the rotation cursor. Every mutation is a
//!   named, atomic, observable operation.
//!
//! - **[`Dispatcher`]** — routes each inbound wire frame to exactly one
//!   store mutation and fires classified [`Notification`]s for
//!   alert-like kinds. Malformed frames are dropped at this boundary.
//!
//! - **[`RotationScheduler`]** — timer-driven round-robin cursor over
//!   the currently-online camera set, resampled every tick.
//!
//! - **[`EntityStream`]** — subscription handle vended by the store for
//!   reactive consumers.
//!
//! The rendering layer, zone editor, and settings UI live elsewhere and
//! consume this crate through store snapshots and subscriptions.

pub mod convert;
pub mod dispatch;
pub mod engine;
pub mod error;
mod live;
pub mod model;
pub mod notify;
pub mod rotation;
mod sim;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use dispatch::Dispatcher;
pub use engine::{Dashboard, EngineConfig, DEFAULT_DISCOVERY_URL, DEFAULT_PERSON_TTL, DEFAULT_WS_URL};
pub use error::CoreError;
pub use notify::{Notification, Notifier, Urgency};
pub use rotation::RotationScheduler;
pub use store::{DashboardStore, DataSource, RotationCursor, DEFAULT_EVENT_CAP, DEFAULT_ROTATION_INTERVAL};
pub use stream::EntityStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AiModel,
    AlertEvent,
    AlertKind,
    AlertLevel,
    BoundingBox,
    Camera,
    CameraStats,
    CameraStatus,
    ChartData,
    DashboardStats,
    HeatmapData,
    HeatmapPoint,
    Keypoint,
    ModePreset,
    ModelStatus,
    OperationMode,
    Person,
    Point,
    Severity,
    TimeSeriesPoint,
    Zone,
    ZoneKind,
    ZoneSeries,
    ZoneStats,
};
