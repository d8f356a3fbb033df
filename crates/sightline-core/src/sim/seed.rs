// ── Simulation seed dataset ──
//
// The fixture a fresh mock session starts from: a small site with six
// cameras (one offline), five zones, a few dozen tracked people, recent
// alert history, aggregate stats, heatmaps and crowd-trend series.

use std::collections::BTreeMap;

use chrono::Utc;
use rand::Rng;

use crate::model::{
    AlertEvent, AlertKind, BoundingBox, Camera, CameraStats, CameraStatus, ChartData, DashboardStats,
    HeatmapData, HeatmapPoint, Keypoint, Person, Point, Severity, TimeSeriesPoint, Zone, ZoneKind,
    ZoneSeries, ZoneStats,
};

pub fn seed_cameras() -> Vec<Camera> {
    let table: [(&str, &str, &str, CameraStatus, &str, u32); 6] = [
        ("cam-01", "Main Entrance", "Building A - Front", CameraStatus::Online, "1920x1080", 30),
        ("cam-02", "Lobby", "Building A - Ground Floor", CameraStatus::Online, "1920x1080", 30),
        ("cam-03", "Cafeteria", "Building A - Floor 1", CameraStatus::Online, "1920x1080", 25),
        ("cam-04", "Parking Lot", "External - North", CameraStatus::Online, "2560x1440", 30),
        ("cam-05", "Loading Dock", "Building B - Rear", CameraStatus::Offline, "1920x1080", 30),
        ("cam-06", "Stairwell A", "Building A - Central", CameraStatus::Online, "1280x720", 20),
    ];

    table.into_iter()
        .map(|(id, name, location, status, resolution, fps)| Camera {
            id: id.into(),
            name: name.into(),
            location: location.into(),
            stream_url: format!("/streams/{id}/stream.mjpeg"),
            status,
            resolution: resolution.into(),
            fps,
        })
        .collect()
}

pub fn seed_zones() -> Vec<Zone> {
    vec![
        Zone {
            id: "zone-01".into(),
            name: "Entry Queue".into(),
            camera_id: "cam-01".into(),
            points: rect(0.1, 0.3, 0.5, 0.9),
            color: "#00d4ff".into(),
            kind: ZoneKind::Entry,
            max_capacity: Some(20),
            loiter_threshold: Some(60),
        },
        Zone {
            id: "zone-02".into(),
            name: "Reception Desk".into(),
            camera_id: "cam-02".into(),
            points: rect(0.3, 0.2, 0.7, 0.6),
            color: "#ff9500".into(),
            kind: ZoneKind::Crowd,
            max_capacity: Some(10),
            loiter_threshold: Some(120),
        },
        Zone {
            id: "zone-03".into(),
            name: "Seating Area".into(),
            camera_id: "cam-03".into(),
            points: rect(0.05, 0.1, 0.95, 0.85),
            color: "#00ff88".into(),
            kind: ZoneKind::Crowd,
            max_capacity: Some(50),
            loiter_threshold: None,
        },
        Zone {
            id: "zone-04".into(),
            name: "Restricted Area".into(),
            camera_id: "cam-04".into(),
            points: rect(0.6, 0.5, 0.95, 0.95),
            color: "#ff3b3b".into(),
            kind: ZoneKind::Restricted,
            max_capacity: None,
            loiter_threshold: Some(30),
        },
        Zone {
            id: "zone-05".into(),
            name: "Exit Gate".into(),
            camera_id: "cam-01".into(),
            points: rect(0.6, 0.3, 0.9, 0.9),
            color: "#9945ff".into(),
            kind: ZoneKind::Exit,
            max_capacity: Some(15),
            loiter_threshold: None,
        },
    ]
}

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
    vec![
        Point { x: x0, y: y0 },
        Point { x: x1, y: y0 },
        Point { x: x1, y: y1 },
        Point { x: x0, y: y1 },
    ]
}

/// Tracked people distributed over the seed site, with full skeletons.
pub fn seed_people(rng: &mut impl Rng) -> Vec<Person> {
    let mut people = Vec::with_capacity(33);
    let mut next = 0usize;

    for i in 0..5 {
        let zone = if i % 2 == 0 { "zone-01" } else { "zone-05" };
        people.push(generate_person(rng, next, "cam-01", Some(zone)));
        next += 1;
    }
    for _ in 0..8 {
        people.push(generate_person(rng, next, "cam-02", Some("zone-02")));
        next += 1;
    }
    for _ in 0..15 {
        people.push(generate_person(rng, next, "cam-03", Some("zone-03")));
        next += 1;
    }
    for _ in 0..3 {
        people.push(generate_person(rng, next, "cam-04", Some("zone-04")));
        next += 1;
    }
    for _ in 0..2 {
        people.push(generate_person(rng, next, "cam-06", None));
        next += 1;
    }

    people
}

/// One synthetic tracked person at a plausible position.
pub fn generate_person(
    rng: &mut impl Rng,
    index: usize,
    camera_id: &str,
    zone_id: Option<&str>,
) -> Person {
    let base_x = rng.gen_range(0.1..0.9);
    let base_y = rng.gen_range(0.2..0.8);

    // (name, dx, dy) offsets for a 15-point COCO-style skeleton
    let skeleton: [(&str, f64, f64); 15] = [
        ("nose", 0.04, 0.02),
        ("left_eye", 0.035, 0.015),
        ("right_eye", 0.045, 0.015),
        ("left_shoulder", 0.02, 0.05),
        ("right_shoulder", 0.06, 0.05),
        ("left_elbow", 0.01, 0.08),
        ("right_elbow", 0.07, 0.08),
        ("left_wrist", 0.005, 0.11),
        ("right_wrist", 0.075, 0.11),
        ("left_hip", 0.025, 0.1),
        ("right_hip", 0.055, 0.1),
        ("left_knee", 0.02, 0.14),
        ("right_knee", 0.06, 0.14),
        ("left_ankle", 0.02, 0.18),
        ("right_ankle", 0.06, 0.18),
    ];

    let keypoints = skeleton
        .into_iter()
        .map(|(name, dx, dy)| Keypoint {
            name: name.into(),
            x: base_x + dx,
            y: base_y + dy,
            confidence: rng.gen_range(0.7..0.96),
        })
        .collect();

    Person {
        id: format!("person-{index}"),
        track_id: format!("track-{index}"),
        camera_id: camera_id.into(),
        zone_id: zone_id.map(Into::into),
        bbox: BoundingBox {
            x: base_x,
            y: base_y,
            width: 0.08 + rng.gen_range(0.0..0.04),
            height: 0.15 + rng.gen_range(0.0..0.1),
        },
        keypoints: Some(keypoints),
        confidence: 0.85 + rng.gen_range(0.0..0.15),
        timestamp: Utc::now().timestamp_millis(),
        dwell_time: rng.gen_range(0..300_000),
        is_loitering: rng.gen_bool(0.15),
        is_fallen: rng.gen_bool(0.02),
    }
}

/// Recent alert history, newest first, timestamped relative to `now_ms`.
pub fn seed_events(now_ms: i64) -> Vec<AlertEvent> {
    vec![
        AlertEvent {
            id: "evt-001".into(),
            kind: AlertKind::FallDetected,
            severity: Severity::Critical,
            camera_id: "cam-06".into(),
            zone_id: None,
            person_id: Some("person-31".into()),
            message: "Fall detected in Stairwell A - Person appears to have fallen".into(),
            timestamp: now_ms - 180_000,
            acknowledged: false,
            snapshot_url: Some("/snapshots/fall-001.jpg".into()),
            metadata: Some(meta(&[("confidence", 0.94.into()), ("duration_ms", 2500.into())])),
        },
        AlertEvent {
            id: "evt-002".into(),
            kind: AlertKind::LoiterAlert,
            severity: Severity::Warning,
            camera_id: "cam-04".into(),
            zone_id: Some("zone-04".into()),
            person_id: Some("person-28".into()),
            message: "Loitering detected in Restricted Area - 2m 15s duration".into(),
            timestamp: now_ms - 300_000,
            acknowledged: false,
            snapshot_url: Some("/snapshots/loiter-001.jpg".into()),
            metadata: Some(meta(&[("duration_seconds", 135.into()), ("threshold", 30.into())])),
        },
        AlertEvent {
            id: "evt-003".into(),
            kind: AlertKind::CrowdAlert,
            severity: Severity::Warning,
            camera_id: "cam-03".into(),
            zone_id: Some("zone-03".into()),
            person_id: None,
            message: "Crowd density warning - Cafeteria at 80% capacity".into(),
            timestamp: now_ms - 600_000,
            acknowledged: true,
            snapshot_url: None,
            metadata: Some(meta(&[
                ("currentCount", 40.into()),
                ("maxCapacity", 50.into()),
                ("percentage", 80.into()),
            ])),
        },
        AlertEvent {
            id: "evt-004".into(),
            kind: AlertKind::LoiterAlert,
            severity: Severity::Critical,
            camera_id: "cam-01".into(),
            zone_id: Some("zone-01".into()),
            person_id: Some("person-02".into()),
            message: "Extended loitering at Entry Queue - 5m 30s duration".into(),
            timestamp: now_ms - 900_000,
            acknowledged: true,
            snapshot_url: Some("/snapshots/loiter-002.jpg".into()),
            metadata: Some(meta(&[("duration_seconds", 330.into()), ("threshold", 60.into())])),
        },
        AlertEvent {
            id: "evt-005".into(),
            kind: AlertKind::PersonDetected,
            severity: Severity::Info,
            camera_id: "cam-04".into(),
            zone_id: Some("zone-04".into()),
            person_id: Some("person-29".into()),
            message: "Person entered Restricted Area".into(),
            timestamp: now_ms - 1_200_000,
            acknowledged: true,
            snapshot_url: None,
            metadata: None,
        },
        AlertEvent {
            id: "evt-006".into(),
            kind: AlertKind::FallDetected,
            severity: Severity::Critical,
            camera_id: "cam-02".into(),
            zone_id: None,
            person_id: Some("person-08".into()),
            message: "Fall detected in Lobby - Immediate response required".into(),
            timestamp: now_ms - 3_600_000,
            acknowledged: true,
            snapshot_url: Some("/snapshots/fall-002.jpg".into()),
            metadata: Some(meta(&[
                ("confidence", 0.89.into()),
                ("response_time_ms", 45_000.into()),
            ])),
        },
        AlertEvent {
            id: "evt-007".into(),
            kind: AlertKind::ZoneUpdate,
            severity: Severity::Info,
            camera_id: "cam-03".into(),
            zone_id: Some("zone-03".into()),
            person_id: None,
            message: "Zone configuration updated - Seating Area capacity changed".into(),
            timestamp: now_ms - 7_200_000,
            acknowledged: true,
            snapshot_url: None,
            metadata: Some(meta(&[("old_capacity", 40.into()), ("new_capacity", 50.into())])),
        },
    ]
}

fn meta(pairs: &[(&str, serde_json::Value)]) -> BTreeMap<String, serde_json::Value> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect()
}

pub fn seed_stats() -> DashboardStats {
    DashboardStats {
        total_people_now: 33,
        total_detections_today: 1247,
        alerts_today: 12,
        critical_alerts_today: 2,
        falls_detected: 2,
        loitering_incidents: 8,
        avg_dwell_time: 145.0,
        peak_hour: "12:00".into(),
        cameras: vec![
            CameraStats {
                camera_id: "cam-01".into(),
                total_detections: 312,
                current_people: 5,
                zones: vec![
                    zone_stats("zone-01", 3, 20, 45.0, "09:00"),
                    zone_stats("zone-05", 2, 15, 15.0, "17:00"),
                ],
            },
            CameraStats {
                camera_id: "cam-02".into(),
                total_detections: 445,
                current_people: 8,
                zones: vec![zone_stats("zone-02", 8, 10, 180.0, "11:00")],
            },
            CameraStats {
                camera_id: "cam-03".into(),
                total_detections: 289,
                current_people: 15,
                zones: vec![zone_stats("zone-03", 15, 50, 900.0, "12:30")],
            },
            CameraStats {
                camera_id: "cam-04".into(),
                total_detections: 87,
                current_people: 3,
                zones: vec![zone_stats("zone-04", 3, 5, 60.0, "14:00")],
            },
            CameraStats {
                camera_id: "cam-06".into(),
                total_detections: 114,
                current_people: 2,
                zones: Vec::new(),
            },
        ],
    }
}

fn zone_stats(zone_id: &str, current: i64, max: i64, dwell: f64, peak: &str) -> ZoneStats {
    ZoneStats {
        zone_id: zone_id.into(),
        current_count: current,
        max_count: max,
        avg_dwell_time: dwell,
        peak_time: peak.into(),
    }
}

pub fn seed_heatmaps(now_ms: i64) -> Vec<HeatmapData> {
    let table: [(&str, &[(f64, f64, f64)]); 4] = [
        (
            "cam-01",
            &[
                (0.25, 0.5, 0.8),
                (0.3, 0.55, 0.9),
                (0.35, 0.6, 0.7),
                (0.75, 0.5, 0.6),
                (0.8, 0.6, 0.5),
            ],
        ),
        (
            "cam-02",
            &[
                (0.5, 0.4, 0.95),
                (0.45, 0.45, 0.85),
                (0.55, 0.35, 0.75),
                (0.4, 0.5, 0.6),
                (0.6, 0.5, 0.65),
            ],
        ),
        (
            "cam-03",
            &[
                (0.3, 0.4, 0.7),
                (0.5, 0.5, 0.9),
                (0.7, 0.4, 0.6),
                (0.4, 0.6, 0.8),
                (0.6, 0.6, 0.75),
                (0.5, 0.3, 0.5),
            ],
        ),
        ("cam-04", &[(0.75, 0.7, 0.6), (0.8, 0.75, 0.5)]),
    ];

    table.into_iter()
        .map(|(camera_id, points)| HeatmapData {
            camera_id: camera_id.into(),
            points: points
                .iter()
                .map(|&(x, y, value)| HeatmapPoint { x, y, value })
                .collect(),
            timestamp: now_ms,
        })
        .collect()
}

pub fn seed_chart_data() -> ChartData {
    let hourly_values = [
        5.0, 3.0, 2.0, 1.0, 2.0, 5.0, 12.0, 28.0, 45.0, 52.0, 48.0, 55.0, 68.0, 62.0, 50.0, 48.0,
        45.0, 52.0, 35.0, 22.0, 15.0, 10.0, 8.0, 6.0,
    ];
    let hourly = hourly_values
        .into_iter()
        .enumerate()
        .map(|(hour, value)| TimeSeriesPoint {
            time: format!("{hour:02}:00"),
            value,
        })
        .collect();

    let daily = [
        ("Mon", 342.0),
        ("Tue", 378.0),
        ("Wed", 395.0),
        ("Thu", 410.0),
        ("Fri", 385.0),
        ("Sat", 225.0),
        ("Sun", 180.0),
    ]
    .into_iter()
    .map(|(time, value)| TimeSeriesPoint {
        time: time.into(),
        value,
    })
    .collect();

    ChartData {
        hourly,
        daily,
        by_zone: vec![
            ZoneSeries {
                zone_id: "zone-01".into(),
                zone_name: "Entry Queue".into(),
                data: series(&[(8, 12.0), (9, 18.0), (10, 15.0), (11, 14.0), (12, 22.0)]),
            },
            ZoneSeries {
                zone_id: "zone-03".into(),
                zone_name: "Cafeteria".into(),
                data: series(&[(8, 5.0), (9, 8.0), (10, 12.0), (11, 25.0), (12, 45.0)]),
            },
        ],
    }
}

fn series(points: &[(u32, f64)]) -> Vec<TimeSeriesPoint> {
    points
        .iter()
        .map(|&(hour, value)| TimeSeriesPoint {
            time: format!("{hour:02}:00"),
            value,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn seed_site_is_consistent() {
        let cameras = seed_cameras();
        assert_eq!(cameras.len(), 6);
        assert_eq!(
            cameras.iter().filter(|c| c.status.is_online()).count(),
            5
        );

        let camera_ids: Vec<&str> = cameras.iter().map(|c| c.id.as_str()).collect();
        for zone in seed_zones() {
            assert!(camera_ids.contains(&zone.camera_id.as_str()));
        }
    }

    #[test]
    fn seed_people_cover_the_expected_cameras() {
        let mut rng = rand::thread_rng();
        let people = seed_people(&mut rng);
        assert_eq!(people.len(), 33);
        assert_eq!(
            people.iter().filter(|p| p.camera_id == "cam-03").count(),
            15
        );
        let keypoints = people[0].keypoints.as_ref().unwrap();
        assert_eq!(keypoints.len(), 15);
    }

    #[test]
    fn seed_events_are_newest_first() {
        let events = seed_events(10_000_000);
        assert_eq!(events.len(), 7);
        for pair in events.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[test]
    fn seed_chart_has_a_full_day() {
        let chart = seed_chart_data();
        assert_eq!(chart.hourly.len(), 24);
        assert_eq!(chart.daily.len(), 7);
        assert_eq!(chart.by_zone.len(), 2);
        assert_eq!(chart.hourly[12].time, "12:00");
    }
}
