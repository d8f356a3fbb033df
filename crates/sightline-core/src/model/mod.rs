// ── Domain model ──
//
// Canonical entity types for the dashboard. All wire-facing structs use
// camelCase field names to match the backend's JSON contract.

mod ai_model;
mod alert;
mod camera;
mod chart;
mod heatmap;
mod person;
mod stats;
mod zone;

pub use ai_model::{AiModel, AlertLevel, ModePreset, ModelStatus, OperationMode, default_models, mode_presets};
pub use alert::{AlertEvent, AlertKind, Severity};
pub use camera::{Camera, CameraStatus};
pub use chart::{ChartData, TimeSeriesPoint, ZoneSeries};
pub use heatmap::{HeatmapData, HeatmapPoint};
pub use person::{BoundingBox, Keypoint, Person};
pub use stats::{CameraStats, DashboardStats, ZoneStats};
pub use zone::{Point, Zone, ZoneKind};

/// An entity addressable by a stable string id.
///
/// Implemented by every type stored in a keyed collection; the id is the
/// collection key.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Camera {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Zone {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Person {
    fn key(&self) -> &str {
        &self.id
    }
}
