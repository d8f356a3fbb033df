// ── Engine facade ──
//
// Full lifecycle management for one dashboard session. Owns the store,
// the notifier, the rotation scheduler, the staleness sweeper, and --
// crucially -- the single producer slot: at any moment at most one of
// {live link, simulation} feeds detection data, and switching always
// tears the old producer down before the new one starts.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;
use url::Url;

use sightline_api::DiscoveryClient;

use crate::convert;
use crate::dispatch::Dispatcher;
use crate::error::CoreError;
use crate::live::LiveSource;
use crate::model::{AlertEvent, Camera, Person};
use crate::notify::{Notification, Notifier};
use crate::rotation::RotationScheduler;
use crate::sim::SimulationSource;
use crate::store::{DashboardStore, DataSource};

pub const DEFAULT_WS_URL: &str = "ws://localhost:3851/ws";
pub const DEFAULT_DISCOVERY_URL: &str = "http://localhost:1984";

/// Person tracks not refreshed within this window are evicted. The wire
/// contract never signals track end, so this is a local policy choice,
/// not backend behavior.
pub const DEFAULT_PERSON_TTL: Duration = Duration::from_secs(10);

const PERSON_SWEEP_INTERVAL: Duration = Duration::from_secs(5);

// ── EngineConfig ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Event link endpoint.
    pub ws_url: Url,
    /// Stream gateway base URL for camera discovery.
    pub discovery_url: Url,
    /// Staleness window for person-track eviction.
    pub person_ttl: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ws_url: Url::parse(DEFAULT_WS_URL).expect("default ws url is valid"),
            discovery_url: Url::parse(DEFAULT_DISCOVERY_URL).expect("default discovery url is valid"),
            person_ttl: DEFAULT_PERSON_TTL,
        }
    }
}

// ── Producer slot ────────────────────────────────────────────────────

enum ActiveProducer {
    Idle,
    Live(LiveSource),
    Mock(SimulationSource),
}

// ── Dashboard ────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable. Construct once per session, then call
/// [`set_source`](Self::set_source) to activate a producer; every other
/// component receives the store by handle from here.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: EngineConfig,
    store: Arc<DashboardStore>,
    notifier: Notifier,
    dispatcher: Dispatcher,
    scheduler: RotationScheduler,
    producer: Mutex<ActiveProducer>,
    /// Camera set for live mode: persisted selection at startup,
    /// replaced by discovery selections.
    live_cameras: std::sync::Mutex<Vec<Camera>>,
    cancel: CancellationToken,
    sweeper_started: AtomicBool,
}

impl Dashboard {
    pub fn new(config: EngineConfig) -> Self {
        let store = Arc::new(DashboardStore::new());
        let notifier = Notifier::new();
        let dispatcher = Dispatcher::new(Arc::clone(&store), notifier.clone());
        let scheduler = RotationScheduler::new(Arc::clone(&store));

        Self {
            inner: Arc::new(DashboardInner {
                config,
                store,
                notifier,
                dispatcher,
                scheduler,
                producer: Mutex::new(ActiveProducer::Idle),
                live_cameras: std::sync::Mutex::new(Vec::new()),
                cancel: CancellationToken::new(),
                sweeper_started: AtomicBool::new(false),
            }),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<DashboardStore> {
        &self.inner.store
    }

    /// Subscribe to user-visible notifications.
    pub fn notifications(&self) -> broadcast::Receiver<Arc<Notification>> {
        self.inner.notifier.subscribe()
    }

    /// The dispatcher, for embedders that feed frames from their own
    /// transport.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    /// The camera rotation scheduler.
    pub fn scheduler(&self) -> &RotationScheduler {
        &self.inner.scheduler
    }

    // ── Producer switching ───────────────────────────────────────────

    /// Activate a data source, tearing down whichever producer was
    /// active first.
    ///
    /// The sequence is strict: stop old producer, clear
    /// detection-derived state, install the new source's baseline
    /// (seed dataset for mock, selected camera set for live), start the
    /// new producer. A reader never observes half of each.
    pub async fn set_source(&self, source: DataSource) {
        self.ensure_sweeper();

        let mut slot = self.inner.producer.lock().await;

        // Reentrancy: activating the already-active producer is a no-op,
        // not a restart.
        let already_active = matches!(
            (&*slot, source),
            (ActiveProducer::Live(_), DataSource::Live)
                | (ActiveProducer::Mock(_), DataSource::Mock)
        );
        if already_active {
            return;
        }

        match std::mem::replace(&mut *slot, ActiveProducer::Idle) {
            ActiveProducer::Live(live) => live.stop(),
            ActiveProducer::Mock(sim) => sim.stop(),
            ActiveProducer::Idle => {}
        }
        self.inner.store.set_link_up(false);
        self.inner.store.clear_detection_state();

        match source {
            DataSource::Mock => {
                *slot = ActiveProducer::Mock(SimulationSource::start(
                    Arc::clone(&self.inner.store),
                    self.inner.cancel.child_token(),
                ));
            }
            DataSource::Live => {
                let cameras = self.live_cameras();
                self.inner.store.set_cameras(cameras);
                // zones come from the zone editor in live mode; mock
                // zones must not linger on live cameras
                self.inner.store.set_zones(Vec::new());
                *slot = ActiveProducer::Live(LiveSource::start(
                    self.inner.config.ws_url.clone(),
                    Arc::clone(&self.inner.store),
                    self.inner.dispatcher.clone(),
                    self.inner.notifier.clone(),
                    self.inner.cancel.child_token(),
                ));
            }
        }
        drop(slot);

        self.inner.store.set_source(source);
        tracing::info!(?source, "data source switched");
    }

    /// Flip between live and mock. Returns the newly active source.
    pub async fn toggle_source(&self) -> DataSource {
        let next = match self.inner.store.source() {
            DataSource::Live => DataSource::Mock,
            DataSource::Mock => DataSource::Live,
        };
        self.set_source(next).await;
        next
    }

    /// Tear everything down: rotation, the active producer, sweeper,
    /// any pending reconnect. Idempotent.
    pub async fn shutdown(&self) {
        self.inner.scheduler.stop();

        let mut slot = self.inner.producer.lock().await;
        match std::mem::replace(&mut *slot, ActiveProducer::Idle) {
            ActiveProducer::Live(live) => live.stop(),
            ActiveProducer::Mock(sim) => sim.stop(),
            ActiveProducer::Idle => {}
        }
        drop(slot);

        self.inner.cancel.cancel();
        self.inner.store.set_link_up(false);
        tracing::debug!("engine shut down");
    }

    // ── Camera setup ─────────────────────────────────────────────────

    /// Query the stream gateway for available stream ids.
    pub async fn discover_cameras(&self) -> Result<Vec<String>, CoreError> {
        let discovery = DiscoveryClient::new(self.inner.config.discovery_url.clone());
        Ok(discovery.list_streams().await?)
    }

    /// Turn a stream selection into the live camera set. Applied to the
    /// store immediately when live mode is active; otherwise it takes
    /// effect on the next switch to live.
    pub fn apply_camera_selection(&self, stream_ids: &[String]) -> Result<Vec<Camera>, CoreError> {
        let discovery = DiscoveryClient::new(self.inner.config.discovery_url.clone());
        let cameras: Vec<Camera> = stream_ids
            .iter()
            .map(|id| convert::camera_from_stream(&discovery, id))
            .collect::<Result<_, _>>()?;

        *self.lock_live_cameras() = cameras.clone();
        if self.inner.store.source() == DataSource::Live {
            self.inner.store.set_cameras(cameras.clone());
        }
        Ok(cameras)
    }

    /// Seed the live camera set (e.g. from persisted configuration)
    /// without a discovery round trip.
    pub fn set_live_cameras(&self, cameras: Vec<Camera>) {
        *self.lock_live_cameras() = cameras;
    }

    // ── Snapshot accessors (delegate to the store) ───────────────────

    pub fn cameras(&self) -> Arc<Vec<Arc<Camera>>> {
        self.inner.store.cameras()
    }

    pub fn people(&self) -> Arc<Vec<Arc<Person>>> {
        self.inner.store.people()
    }

    pub fn events(&self) -> Arc<Vec<Arc<AlertEvent>>> {
        self.inner.store.events()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn live_cameras(&self) -> Vec<Camera> {
        self.lock_live_cameras().clone()
    }

    fn lock_live_cameras(&self) -> std::sync::MutexGuard<'_, Vec<Camera>> {
        self.inner
            .live_cameras
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Spawn the staleness sweeper exactly once, lazily, so that plain
    /// construction stays runtime-free.
    fn ensure_sweeper(&self) {
        if self.inner.sweeper_started.swap(true, Ordering::SeqCst) {
            return;
        }
        let store = Arc::clone(&self.inner.store);
        let ttl = self.inner.config.person_ttl;
        let cancel = self.inner.cancel.child_token();
        tokio::spawn(async move {
            sweep_loop(store, ttl, cancel).await;
        });
    }
}

// ── Staleness sweeper ────────────────────────────────────────────────

async fn sweep_loop(store: Arc<DashboardStore>, ttl: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(PERSON_SWEEP_INTERVAL);
    ticker.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let evicted = store.prune_stale_people(ttl);
                if evicted > 0 {
                    tracing::debug!(evicted, "stale person tracks evicted");
                }
            }
        }
    }

    tracing::debug!("staleness sweeper exiting");
}

// ── Tests ────────────────────────────────────────────────────────────
