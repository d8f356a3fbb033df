// ── Aggregate statistics snapshots ──
//
// Point-in-time aggregates, wholesale-replaced by inbound stat messages.
// The simulation source is the one producer that perturbs counters
// incrementally instead of replacing the whole snapshot.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStats {
    pub zone_id: String,
    pub current_count: i64,
    pub max_count: i64,
    /// Seconds.
    pub avg_dwell_time: f64,
    pub peak_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraStats {
    pub camera_id: String,
    pub total_detections: i64,
    pub current_people: i64,
    #[serde(default)]
    pub zones: Vec<ZoneStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_people_now: i64,
    pub total_detections_today: i64,
    pub alerts_today: i64,
    pub critical_alerts_today: i64,
    pub falls_detected: i64,
    pub loitering_incidents: i64,
    /// Seconds.
    pub avg_dwell_time: f64,
    pub peak_hour: String,
    #[serde(default)]
    pub cameras: Vec<CameraStats>,
}
