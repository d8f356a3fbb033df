// ── Discovery-to-domain conversion ──
//
// Camera entities derived from the stream gateway's discovery contract:
// the stream id becomes the camera id, a human-readable name is formed
// from the id, and the stream URL points at the gateway's frame
// endpoint.

use sightline_api::DiscoveryClient;

use crate::model::{Camera, CameraStatus};

/// `"front-door"` / `"loading_dock"` -> `"Front Door"` / `"Loading Dock"`.
pub fn format_stream_name(id: &str) -> String {
    id.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Build a camera entity from one discovered stream id.
pub fn camera_from_stream(
    discovery: &DiscoveryClient,
    stream_id: &str,
) -> Result<Camera, sightline_api::Error> {
    let frame_url = discovery.frame_url(stream_id)?;
    Ok(Camera {
        id: stream_id.to_owned(),
        name: format_stream_name(stream_id),
        location: "Auto-discovered".into(),
        stream_url: frame_url.to_string(),
        status: CameraStatus::Online,
        resolution: "1920x1080".into(),
        fps: 30,
    })
}

/// Milliseconds-since-epoch for "now"; the wire contract's clock.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn stream_names_split_on_hyphen_and_underscore() {
        assert_eq!(format_stream_name("front-door"), "Front Door");
        assert_eq!(format_stream_name("loading_dock_2"), "Loading Dock 2");
        assert_eq!(format_stream_name("lobby"), "Lobby");
        assert_eq!(format_stream_name("a--b"), "A B");
    }

    #[test]
    fn camera_from_stream_synthesizes_frame_url() {
        let discovery = DiscoveryClient::new(Url::parse("http://localhost:1984").unwrap());
        let camera = camera_from_stream(&discovery, "front-door").unwrap();

        assert_eq!(camera.id, "front-door");
        assert_eq!(camera.name, "Front Door");
        assert_eq!(
            camera.stream_url,
            "http://localhost:1984/api/frame.jpeg?src=front-door"
        );
        assert_eq!(camera.status, CameraStatus::Online);
    }
}
