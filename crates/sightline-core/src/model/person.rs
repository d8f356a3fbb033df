// ── Person detection track ──

use serde::{Deserialize, Serialize};

/// Normalized bounding box. Coordinates are nominally in [0,1] but
/// inbound values are not guaranteed clamped; readers must tolerate
/// out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A named 2D skeleton keypoint with detection confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub confidence: f64,
}

/// One tracked person detection.
///
/// This is a detection track, not a durable identity: `track_id` is
/// stable for the same physical person across consecutive frames, and
/// inbound updates replace the whole entry by id. The contract carries
/// no track-end signal, so eviction is the store's staleness policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub track_id: String,
    pub camera_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    pub bbox: BoundingBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keypoints: Option<Vec<Keypoint>>,
    pub confidence: f64,
    /// Epoch milliseconds of the most recent detection frame.
    pub timestamp: i64,
    /// Accumulated milliseconds this track has dwelled in its zone/frame.
    #[serde(default)]
    pub dwell_time: i64,
    #[serde(default)]
    pub is_loitering: bool,
    #[serde(default)]
    pub is_fallen: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn person_deserializes_minimal_payload() {
        let json = r#"{
            "id": "person-7",
            "trackId": "track-7",
            "cameraId": "cam-03",
            "bbox": { "x": 0.4, "y": 0.3, "width": 0.1, "height": 0.2 },
            "confidence": 0.91,
            "timestamp": 1700000000000
        }"#;
        let p: Person = serde_json::from_str(json).unwrap();
        assert_eq!(p.track_id, "track-7");
        assert!(p.zone_id.is_none());
        assert!(p.keypoints.is_none());
        assert_eq!(p.dwell_time, 0);
        assert!(!p.is_loitering);
        assert!(!p.is_fallen);
    }

    #[test]
    fn person_accepts_unclamped_bbox() {
        let json = r#"{
            "id": "person-8",
            "trackId": "track-8",
            "cameraId": "cam-01",
            "bbox": { "x": 1.2, "y": -0.1, "width": 0.3, "height": 0.4 },
            "confidence": 0.5,
            "timestamp": 1
        }"#;
        let p: Person = serde_json::from_str(json).unwrap();
        assert!(p.bbox.x > 1.0);
    }
}
