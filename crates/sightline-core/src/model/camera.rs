// ── Camera domain type ──

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraStatus {
    Online,
    Offline,
    Error,
}

impl CameraStatus {
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// A registered camera feed.
///
/// Created by configuration or discovery. Status may transition at any
/// time; zones and people referencing a camera that has since vanished
/// are tolerated by readers, never fatal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub id: String,
    pub name: String,
    pub location: String,
    pub stream_url: String,
    pub status: CameraStatus,
    pub resolution: String,
    pub fps: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_lowercase() {
        let json = serde_json::to_string(&CameraStatus::Online).unwrap();
        assert_eq!(json, r#""online""#);
        let back: CameraStatus = serde_json::from_str(r#""error""#).unwrap();
        assert_eq!(back, CameraStatus::Error);
    }

    #[test]
    fn camera_deserializes_camel_case() {
        let json = r#"{
            "id": "cam-01",
            "name": "Main Entrance",
            "location": "Building A - Front",
            "streamUrl": "/streams/cam-01/stream.mjpeg",
            "status": "online",
            "resolution": "1920x1080",
            "fps": 30
        }"#;
        let cam: Camera = serde_json::from_str(json).unwrap();
        assert_eq!(cam.stream_url, "/streams/cam-01/stream.mjpeg");
        assert!(cam.status.is_online());
    }
}
