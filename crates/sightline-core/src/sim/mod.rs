// ── Simulation data source ──
//
// The mock-mode producer: seeds the store with a fixture dataset, then
// perturbs it on a 1-second ticker so the dashboard feels alive without
// a backend. Satisfies the same mutation contract as the live dispatch
// path -- everything goes through the store's named operations -- and is
// mutually exclusive with the live link (the engine enforces the swap).

pub(crate) mod seed;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::model::{AlertEvent, AlertKind, Camera, Person, Severity};
use crate::store::DashboardStore;

const SIM_TICK: Duration = Duration::from_secs(1);

/// Probability per tick of emitting a synthetic alert.
const ALERT_PROBABILITY: f64 = 0.15;

/// Handle to a running simulation producer.
///
/// Created by the engine when mock mode activates; stopping cancels the
/// ticker. The seed dataset is loaded synchronously before the first
/// tick, so the store is fully populated the moment this returns.
pub(crate) struct SimulationSource {
    cancel: CancellationToken,
}

impl SimulationSource {
    pub(crate) fn start(store: Arc<DashboardStore>, cancel: CancellationToken) -> Self {
        load_seed_dataset(&store);

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            tick_loop(store, task_cancel).await;
        });

        Self { cancel }
    }

    pub(crate) fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for SimulationSource {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Install the full mock fixture.
pub(crate) fn load_seed_dataset(store: &DashboardStore) {
    let now_ms = Utc::now().timestamp_millis();
    let mut rng = StdRng::from_entropy();

    store.set_cameras(seed::seed_cameras());
    store.set_zones(seed::seed_zones());
    store.set_people(seed::seed_people(&mut rng));
    store.set_events(seed::seed_events(now_ms));
    store.set_stats(seed::seed_stats());
    for heatmap in seed::seed_heatmaps(now_ms) {
        let camera_id = heatmap.camera_id.clone();
        store.set_heatmap(&camera_id, heatmap);
    }
    store.set_chart_data(seed::seed_chart_data());

    tracing::debug!(
        cameras = store.camera_count(),
        people = store.people().len(),
        events = store.event_count(),
        "seed dataset loaded"
    );
}

// ── Ticker ───────────────────────────────────────────────────────────

async fn tick_loop(store: Arc<DashboardStore>, cancel: CancellationToken) {
    let mut rng = StdRng::from_entropy();
    let mut ticker = tokio::time::interval(SIM_TICK);
    ticker.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                tick(&store, &mut rng);
            }
        }
    }

    tracing::debug!("simulation ticker exiting");
}

/// One simulation step: wander the tracked people, occasionally emit an
/// alert, and nudge the aggregate counters.
fn tick(store: &DashboardStore, rng: &mut StdRng) {
    let now_ms = Utc::now().timestamp_millis();

    let wandered: Vec<Person> = store
        .people()
        .iter()
        .map(|p| {
            let mut p = (**p).clone();
            p.bbox.x = (p.bbox.x + rng.gen_range(-0.01..0.01)).clamp(0.05, 0.9);
            p.bbox.y = (p.bbox.y + rng.gen_range(-0.01..0.01)).clamp(0.1, 0.85);
            p.dwell_time += SIM_TICK.as_millis() as i64;
            p.timestamp = now_ms;
            p
        })
        .collect();
    store.set_people(wandered);

    if rng.gen_bool(ALERT_PROBABILITY) {
        let online = store.online_cameras();
        if let Some(alert) = generate_alert(rng, &online, now_ms) {
            store.add_event(alert);
        }
    }

    if let Some(stats) = store.stats() {
        let mut stats = (*stats).clone();
        stats.total_people_now += rng.gen_range(-1..=1);
        stats.total_detections_today += rng.gen_range(0..5);
        store.set_stats(stats);
    }
}

/// A random synthetic alert on one of the online cameras.
///
/// Returns `None` when no camera is online -- an alert must always
/// reference a camera that could plausibly have produced it.
pub(crate) fn generate_alert(
    rng: &mut impl Rng,
    online: &[Arc<Camera>],
    now_ms: i64,
) -> Option<AlertEvent> {
    let camera = online.get(rng.gen_range(0..online.len().max(1)))?;

    let kinds = [
        AlertKind::PersonDetected,
        AlertKind::FallDetected,
        AlertKind::LoiterAlert,
        AlertKind::CrowdAlert,
    ];
    let kind = kinds[rng.gen_range(0..kinds.len())];

    let severity = match kind {
        AlertKind::FallDetected => Severity::Critical,
        AlertKind::PersonDetected => Severity::Info,
        _ => [Severity::Info, Severity::Warning, Severity::Critical][rng.gen_range(0..3)],
    };

    let messages: &[&str] = match kind {
        AlertKind::PersonDetected => {
            &["Person entered zone", "New detection in area", "Movement detected"]
        }
        AlertKind::FallDetected => &[
            "Fall detected - immediate response needed",
            "Person down alert",
            "Emergency: Fall detected",
        ],
        AlertKind::LoiterAlert => &[
            "Loitering detected",
            "Extended presence in zone",
            "Suspicious activity - loitering",
        ],
        AlertKind::CrowdAlert => &[
            "Crowd density warning",
            "Area approaching capacity",
            "High density detected",
        ],
        AlertKind::ZoneUpdate => &["Zone configuration changed"],
    };

    Some(AlertEvent {
        id: format!("evt-{}", Uuid::new_v4()),
        kind,
        severity,
        camera_id: camera.id.clone(),
        zone_id: None,
        person_id: None,
        message: messages[rng.gen_range(0..messages.len())].to_owned(),
        timestamp: now_ms,
        acknowledged: false,
        snapshot_url: None,
        metadata: None,
    })
}

// ── Tests ────────────────────────────────────────────────────────────
