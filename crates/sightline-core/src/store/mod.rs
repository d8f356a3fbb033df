// ── Central reactive dashboard store ──
//
// The single source of truth for everything the rendering layer reads.
// All mutation goes through the named operations below; every operation
// is atomic with respect to readers, and every collection is observable
// through `watch`-backed snapshots.
//
// Producers (live link, simulation, rotation scheduler, UI actions)
// mutate disjoint regions: detection/alert data belongs to exactly one
// data source at a time, the rotation scheduler writes only its cursor,
// and UI-originated mutations (acknowledge, toggles, zone CRUD) may
// interleave with any of them without corrupting ledger order or cursor
// validity.

mod collection;
mod ledger;

pub use ledger::DEFAULT_EVENT_CAP;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::watch;

use crate::model::{
    AiModel, AlertEvent, AlertKind, Camera, CameraStatus, ChartData, DashboardStats, HeatmapData,
    ModePreset, ModelStatus, OperationMode, Person, Zone, default_models, mode_presets,
};
use crate::stream::EntityStream;
use collection::EntityCollection;
use ledger::EventLedger;

/// Default camera-rotation cadence.
pub const DEFAULT_ROTATION_INTERVAL: Duration = Duration::from_millis(400);

// ── DataSource ───────────────────────────────────────────────────────

/// Which producer currently feeds detection/alert data into the store.
///
/// Exactly one is active at any time; the engine's transition function
/// guarantees teardown-then-setup when switching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSource {
    Live,
    #[default]
    Mock,
}

// ── RotationCursor ───────────────────────────────────────────────────

/// Ephemeral rotation state: fully recomputable from the camera
/// collection, owned by the rotation scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationCursor {
    pub enabled: bool,
    pub index: usize,
    pub camera_id: Option<String>,
    pub interval: Duration,
}

impl Default for RotationCursor {
    fn default() -> Self {
        Self {
            enabled: false,
            index: 0,
            camera_id: None,
            interval: DEFAULT_ROTATION_INTERVAL,
        }
    }
}

// ── DashboardStore ───────────────────────────────────────────────────

pub struct DashboardStore {
    cameras: EntityCollection<Camera>,
    zones: EntityCollection<Zone>,
    people: EntityCollection<Person>,
    events: EventLedger,

    stats: watch::Sender<Option<Arc<DashboardStats>>>,
    heatmaps: DashMap<String, Arc<HeatmapData>>,
    heatmap_version: watch::Sender<u64>,
    chart: watch::Sender<Option<Arc<ChartData>>>,

    // UI state
    selected_camera: watch::Sender<Option<String>>,
    selected_zone: watch::Sender<Option<String>>,
    show_heatmap: watch::Sender<bool>,
    show_skeletons: watch::Sender<bool>,
    show_zone_overlay: watch::Sender<bool>,
    event_filter: watch::Sender<Arc<Vec<AlertKind>>>,
    link_up: watch::Sender<bool>,
    source: watch::Sender<DataSource>,

    // AI models
    models: watch::Sender<Arc<Vec<AiModel>>>,
    current_mode: watch::Sender<OperationMode>,
    presets: Vec<ModePreset>,

    // Rotation
    rotation: watch::Sender<RotationCursor>,

    // Metadata
    last_event: watch::Sender<Option<DateTime<Utc>>>,
}

impl DashboardStore {
    pub fn new() -> Self {
        let (stats, _) = watch::channel(None);
        let (heatmap_version, _) = watch::channel(0u64);
        let (chart, _) = watch::channel(None);
        let (selected_camera, _) = watch::channel(None);
        let (selected_zone, _) = watch::channel(None);
        let (show_heatmap, _) = watch::channel(false);
        let (show_skeletons, _) = watch::channel(true);
        let (show_zone_overlay, _) = watch::channel(true);
        let (event_filter, _) = watch::channel(Arc::new(vec![
            AlertKind::FallDetected,
            AlertKind::LoiterAlert,
            AlertKind::CrowdAlert,
        ]));
        let (link_up, _) = watch::channel(false);
        let (source, _) = watch::channel(DataSource::default());
        let (models, _) = watch::channel(Arc::new(default_models()));
        let (current_mode, _) = watch::channel(OperationMode::Crowd);
        let (rotation, _) = watch::channel(RotationCursor::default());
        let (last_event, _) = watch::channel(None);

        Self {
            cameras: EntityCollection::new(),
            zones: EntityCollection::new(),
            people: EntityCollection::new(),
            events: EventLedger::new(DEFAULT_EVENT_CAP),
            stats,
            heatmaps: DashMap::new(),
            heatmap_version,
            chart,
            selected_camera,
            selected_zone,
            show_heatmap,
            show_skeletons,
            show_zone_overlay,
            event_filter,
            link_up,
            source,
            models,
            current_mode,
            presets: mode_presets(),
            rotation,
            last_event,
        }
    }

    // ── Cameras ──────────────────────────────────────────────────────

    pub fn set_cameras(&self, cameras: Vec<Camera>) {
        self.cameras.replace_all(cameras);
    }

    pub fn upsert_camera(&self, camera: Camera) -> bool {
        self.cameras.upsert(camera)
    }

    /// Transition a camera's status in place. No-op on unknown ids.
    pub fn set_camera_status(&self, id: &str, status: CameraStatus) -> bool {
        let Some(existing) = self.cameras.get(id) else {
            return false;
        };
        let mut camera = (*existing).clone();
        camera.status = status;
        self.cameras.replace(camera)
    }

    pub fn camera(&self, id: &str) -> Option<Arc<Camera>> {
        self.cameras.get(id)
    }

    pub fn cameras(&self) -> Arc<Vec<Arc<Camera>>> {
        self.cameras.snapshot()
    }

    /// The eligible rotation set: online cameras, in collection order.
    pub fn online_cameras(&self) -> Vec<Arc<Camera>> {
        self.cameras
            .snapshot()
            .iter()
            .filter(|c| c.status.is_online())
            .cloned()
            .collect()
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    /// Display name for a camera id, tolerating dangling references.
    pub fn camera_name(&self, id: &str) -> String {
        self.cameras
            .get(id)
            .map_or_else(|| "Unknown camera".to_owned(), |c| c.name.clone())
    }

    pub fn subscribe_cameras(&self) -> EntityStream<Camera> {
        EntityStream::new(self.cameras.subscribe())
    }

    // ── Zones ────────────────────────────────────────────────────────

    pub fn set_zones(&self, zones: Vec<Zone>) {
        self.zones.replace_all(zones);
    }

    pub fn add_zone(&self, zone: Zone) {
        self.zones.upsert(zone);
    }

    /// Replace a zone by id. No-op (returns `false`) on unknown ids.
    pub fn update_zone(&self, zone: Zone) -> bool {
        self.zones.replace(zone)
    }

    /// Drop a zone. People and alerts referencing it keep their dangling
    /// zone id; readers fall back to an unknown label.
    pub fn delete_zone(&self, id: &str) -> bool {
        self.zones.remove(id).is_some()
    }

    pub fn zone(&self, id: &str) -> Option<Arc<Zone>> {
        self.zones.get(id)
    }

    pub fn zones(&self) -> Arc<Vec<Arc<Zone>>> {
        self.zones.snapshot()
    }

    pub fn subscribe_zones(&self) -> EntityStream<Zone> {
        EntityStream::new(self.zones.subscribe())
    }

    // ── People ───────────────────────────────────────────────────────

    pub fn set_people(&self, people: Vec<Person>) {
        self.people.replace_all(people);
    }

    /// Insert-or-replace a person track by id (replace semantics, not a
    /// field merge).
    pub fn upsert_person(&self, person: Person) {
        self.people.upsert(person);
    }

    pub fn person(&self, id: &str) -> Option<Arc<Person>> {
        self.people.get(id)
    }

    pub fn people(&self) -> Arc<Vec<Arc<Person>>> {
        self.people.snapshot()
    }

    pub fn subscribe_people(&self) -> EntityStream<Person> {
        EntityStream::new(self.people.subscribe())
    }

    /// Evict person tracks not updated within `max_age`.
    ///
    /// The inbound contract has no track-end message, so staleness is a
    /// local policy: the engine sweeps periodically with a configurable
    /// TTL. Returns how many tracks were dropped.
    pub fn prune_stale_people(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now().timestamp_millis() - max_age.as_millis() as i64;
        self.people.retain(|p| p.timestamp >= cutoff)
    }

    /// Current occupancy of one zone (people whose track names it).
    pub fn zone_occupancy(&self, zone_id: &str) -> usize {
        self.people
            .snapshot()
            .iter()
            .filter(|p| p.zone_id.as_deref() == Some(zone_id))
            .count()
    }

    /// People currently tracked on one camera.
    pub fn people_on_camera(&self, camera_id: &str) -> Vec<Arc<Person>> {
        self.people
            .snapshot()
            .iter()
            .filter(|p| p.camera_id == camera_id)
            .cloned()
            .collect()
    }

    // ── Alert ledger ─────────────────────────────────────────────────

    pub fn add_event(&self, event: AlertEvent) {
        self.events.push(event);
        let _ = self.last_event.send(Some(Utc::now()));
    }

    pub fn set_events(&self, events: Vec<AlertEvent>) {
        self.events.replace_all(events);
    }

    /// Monotonic acknowledge; no-op on unknown or already-acknowledged.
    pub fn acknowledge_event(&self, id: &str) -> bool {
        self.events.acknowledge(id)
    }

    pub fn events(&self) -> Arc<Vec<Arc<AlertEvent>>> {
        self.events.snapshot()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Events passing the current kind filter (pure view).
    pub fn filtered_events(&self) -> Vec<Arc<AlertEvent>> {
        let filter = self.event_filter.borrow().clone();
        self.events.filtered(&filter)
    }

    pub fn subscribe_events(&self) -> watch::Receiver<Arc<Vec<Arc<AlertEvent>>>> {
        self.events.subscribe()
    }

    pub fn set_event_filter(&self, kinds: Vec<AlertKind>) {
        let _ = self.event_filter.send(Arc::new(kinds));
    }

    pub fn event_filter(&self) -> Arc<Vec<AlertKind>> {
        self.event_filter.borrow().clone()
    }

    // ── Stats / heatmaps / chart ─────────────────────────────────────

    /// Wholesale-replace the dashboard aggregate snapshot.
    pub fn set_stats(&self, stats: DashboardStats) {
        let _ = self.stats.send(Some(Arc::new(stats)));
    }

    pub fn stats(&self) -> Option<Arc<DashboardStats>> {
        self.stats.borrow().clone()
    }

    pub fn subscribe_stats(&self) -> watch::Receiver<Option<Arc<DashboardStats>>> {
        self.stats.subscribe()
    }

    /// Replace one camera's heatmap; other cameras are untouched.
    pub fn set_heatmap(&self, camera_id: &str, data: HeatmapData) {
        self.heatmaps.insert(camera_id.to_owned(), Arc::new(data));
        self.heatmap_version.send_modify(|v| *v += 1);
    }

    pub fn heatmap(&self, camera_id: &str) -> Option<Arc<HeatmapData>> {
        self.heatmaps.get(camera_id).map(|r| Arc::clone(r.value()))
    }

    /// All heatmaps, ordered by camera id for deterministic iteration.
    pub fn heatmaps(&self) -> Vec<Arc<HeatmapData>> {
        let mut all: Vec<Arc<HeatmapData>> =
            self.heatmaps.iter().map(|r| Arc::clone(r.value())).collect();
        all.sort_by(|a, b| a.camera_id.cmp(&b.camera_id));
        all
    }

    pub fn subscribe_heatmaps(&self) -> watch::Receiver<u64> {
        self.heatmap_version.subscribe()
    }

    pub fn set_chart_data(&self, data: ChartData) {
        let _ = self.chart.send(Some(Arc::new(data)));
    }

    pub fn chart_data(&self) -> Option<Arc<ChartData>> {
        self.chart.borrow().clone()
    }

    pub fn subscribe_chart_data(&self) -> watch::Receiver<Option<Arc<ChartData>>> {
        self.chart.subscribe()
    }

    // ── UI state ─────────────────────────────────────────────────────

    pub fn set_selected_camera(&self, camera_id: Option<String>) {
        let _ = self.selected_camera.send(camera_id);
    }

    pub fn selected_camera(&self) -> Option<String> {
        self.selected_camera.borrow().clone()
    }

    pub fn set_selected_zone(&self, zone_id: Option<String>) {
        let _ = self.selected_zone.send(zone_id);
    }

    pub fn selected_zone(&self) -> Option<String> {
        self.selected_zone.borrow().clone()
    }

    pub fn toggle_heatmap(&self) {
        self.show_heatmap.send_modify(|v| *v = !*v);
    }

    pub fn show_heatmap(&self) -> bool {
        *self.show_heatmap.borrow()
    }

    pub fn toggle_skeletons(&self) {
        self.show_skeletons.send_modify(|v| *v = !*v);
    }

    pub fn show_skeletons(&self) -> bool {
        *self.show_skeletons.borrow()
    }

    pub fn toggle_zone_overlay(&self) {
        self.show_zone_overlay.send_modify(|v| *v = !*v);
    }

    pub fn show_zone_overlay(&self) -> bool {
        *self.show_zone_overlay.borrow()
    }

    pub fn set_link_up(&self, up: bool) {
        let _ = self.link_up.send(up);
    }

    /// Whether the live event link is currently established. Always
    /// `false` in mock mode -- stale data must be distinguishable from a
    /// fresh connected state.
    pub fn link_up(&self) -> bool {
        *self.link_up.borrow()
    }

    pub fn subscribe_link_up(&self) -> watch::Receiver<bool> {
        self.link_up.subscribe()
    }

    pub(crate) fn set_source(&self, source: DataSource) {
        let _ = self.source.send(source);
    }

    pub fn source(&self) -> DataSource {
        *self.source.borrow()
    }

    pub fn subscribe_source(&self) -> watch::Receiver<DataSource> {
        self.source.subscribe()
    }

    // ── AI models / operation modes ──────────────────────────────────

    pub fn models(&self) -> Arc<Vec<AiModel>> {
        self.models.borrow().clone()
    }

    pub fn active_models(&self) -> Vec<AiModel> {
        self.models
            .borrow()
            .iter()
            .filter(|m| m.enabled)
            .cloned()
            .collect()
    }

    pub fn current_mode(&self) -> OperationMode {
        *self.current_mode.borrow()
    }

    pub fn mode_presets(&self) -> &[ModePreset] {
        &self.presets
    }

    pub fn subscribe_models(&self) -> watch::Receiver<Arc<Vec<AiModel>>> {
        self.models.subscribe()
    }

    /// Manually flip one model's enabled flag.
    ///
    /// Any manual toggle is a one-way transition into the `custom` mode;
    /// only an explicit preset reselection leaves it. Returns `false` on
    /// unknown model ids.
    pub fn toggle_model(&self, model_id: &str) -> bool {
        let changed = self.models.send_if_modified(|models| {
            let Some(pos) = models.iter().position(|m| m.id == model_id) else {
                return false;
            };
            let mut next: Vec<AiModel> = models.as_ref().clone();
            next[pos].enabled = !next[pos].enabled;
            *models = Arc::new(next);
            true
        });

        if changed {
            let _ = self.current_mode.send(OperationMode::Custom);
        }
        changed
    }

    /// Update a model's runtime status and (optionally) measured FPS.
    pub fn set_model_status(&self, model_id: &str, status: ModelStatus, fps: Option<f64>) -> bool {
        self.models.send_if_modified(|models| {
            let Some(pos) = models.iter().position(|m| m.id == model_id) else {
                return false;
            };
            let mut next: Vec<AiModel> = models.as_ref().clone();
            next[pos].status = status;
            if let Some(fps) = fps {
                next[pos].fps = Some(fps);
            }
            *models = Arc::new(next);
            true
        })
    }

    /// Select an operation-mode preset: every model's enabled flag
    /// becomes membership in the preset's model list.
    ///
    /// `Custom` is a sentinel, not a preset: selecting it changes only
    /// the mode label and leaves the manual toggles as they are.
    pub fn set_operation_mode(&self, mode: OperationMode) {
        if mode != OperationMode::Custom {
            let Some(preset) = self.presets.iter().find(|p| p.id == mode) else {
                return;
            };
            self.models.send_modify(|models| {
                let next: Vec<AiModel> = models
                    .iter()
                    .map(|m| {
                        let mut m = m.clone();
                        m.enabled = preset.models.contains(&m.id);
                        m
                    })
                    .collect();
                *models = Arc::new(next);
            });
        }
        let _ = self.current_mode.send(mode);
    }

    // ── Rotation cursor ──────────────────────────────────────────────

    pub fn rotation(&self) -> RotationCursor {
        self.rotation.borrow().clone()
    }

    pub(crate) fn set_rotation(&self, cursor: RotationCursor) {
        let _ = self.rotation.send(cursor);
    }

    pub fn subscribe_rotation(&self) -> watch::Receiver<RotationCursor> {
        self.rotation.subscribe()
    }

    // ── Lifecycle helpers ────────────────────────────────────────────

    /// Drop everything a data source produced: people, alerts, stats,
    /// heatmaps, chart. Cameras, zones, UI flags, models and the
    /// rotation cursor survive. Used when switching producers so the new
    /// source lands on a fresh baseline.
    pub(crate) fn clear_detection_state(&self) {
        self.people.clear();
        self.events.clear();
        let _ = self.stats.send(None);
        self.heatmaps.clear();
        self.heatmap_version.send_modify(|v| *v += 1);
        let _ = self.chart.send(None);
    }

    /// When the most recent producer message was applied.
    pub fn last_event(&self) -> Option<DateTime<Utc>> {
        *self.last_event.borrow()
    }
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────────────
