// ── Heatmap domain type ──

use serde::{Deserialize, Serialize};

/// One normalized intensity sample (all fields nominally in [0,1]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

/// Per-camera intensity bag, replaced wholesale on update and
/// independent across cameras.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapData {
    pub camera_id: String,
    pub points: Vec<HeatmapPoint>,
    /// Epoch milliseconds.
    pub timestamp: i64,
}
