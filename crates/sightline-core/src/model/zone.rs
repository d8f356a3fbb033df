// ── Zone domain type ──

use serde::{Deserialize, Serialize};

/// A normalized (0-1) point in camera frame space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Crowd,
    Restricted,
    Entry,
    Exit,
}

/// A polygonal region on one camera's frame, used for occupancy and
/// loitering aggregation.
///
/// An empty point list is valid (the zone is inert). Owned by the zone
/// editor; the core only reads zones for aggregates and filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub camera_id: String,
    pub points: Vec<Point>,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: ZoneKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<u32>,
    /// Seconds of dwell before a person in this zone counts as loitering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loiter_threshold: Option<u32>,
}
