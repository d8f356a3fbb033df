// ── Camera rotation scheduler ──
//
// Advances a round-robin cursor over the currently-online camera set,
// once per configured interval, on its own timer -- independent of any
// render cycle or other timer in the system. The scheduler writes only
// the store's rotation cursor; detection data is never touched here.
//
// The eligible list is resampled on every tick, never cached: a camera
// going offline mid-rotation is skipped on the next tick without any
// explicit removal step.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::store::{DashboardStore, RotationCursor};

/// Timer-driven round-robin over the online camera set.
///
/// At most one rotation timer exists at a time: `start` clears any prior
/// timer before spawning, and every tick is guarded by a generation
/// check so a stale timer can never mutate the cursor after a
/// stop/restart.
pub struct RotationScheduler {
    store: Arc<DashboardStore>,
    /// Bumped on every start/stop; tick loops exit when theirs is stale.
    generation: Arc<AtomicU64>,
    timer: Mutex<Option<CancellationToken>>,
}

impl RotationScheduler {
    pub fn new(store: Arc<DashboardStore>) -> Self {
        Self {
            store,
            generation: Arc::new(AtomicU64::new(0)),
            timer: Mutex::new(None),
        }
    }

    /// Start rotating. Must be called within a tokio runtime.
    ///
    /// Computes the eligible (online) list now: if it is empty the
    /// scheduler stays stopped; otherwise the cursor lands on index 0
    /// immediately -- the first designation is synchronous with `start`,
    /// not delayed by one interval. Calling `start` while running
    /// replaces the previous timer.
    pub fn start(&self) {
        let mut timer = self.lock_timer();
        if let Some(prior) = timer.take() {
            prior.cancel();
        }
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let eligible = self.store.online_cameras();
        let interval = self.store.rotation().interval;
        tracing::debug!(
            online = eligible.len(),
            interval_ms = interval.as_millis() as u64,
            "starting camera rotation"
        );

        let Some(first) = eligible.first() else {
            tracing::debug!("no online cameras, rotation not enabled");
            self.store.set_rotation(RotationCursor {
                enabled: false,
                index: 0,
                camera_id: None,
                interval,
            });
            return;
        };

        self.store.set_rotation(RotationCursor {
            enabled: true,
            index: 0,
            camera_id: Some(first.id.clone()),
            interval,
        });

        let cancel = CancellationToken::new();
        *timer = Some(cancel.clone());
        drop(timer);

        let store = Arc::clone(&self.store);
        let generation = Arc::clone(&self.generation);
        tokio::spawn(async move {
            tick_loop(store, cancel, generation, my_generation, interval).await;
        });
    }

    /// Cancel the timer and reset the cursor. Idempotent: a second stop
    /// observes the same state, and no tick fires afterwards.
    pub fn stop(&self) {
        let mut timer = self.lock_timer();
        if let Some(prior) = timer.take() {
            prior.cancel();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        drop(timer);

        let interval = self.store.rotation().interval;
        self.store.set_rotation(RotationCursor {
            enabled: false,
            index: 0,
            camera_id: None,
            interval,
        });
    }

    /// Change the rotation cadence. If running, atomically
    /// stop-then-restart on the new interval -- no drift accumulation,
    /// never two concurrent timers.
    pub fn set_interval(&self, interval: Duration) {
        let mut cursor = self.store.rotation();
        cursor.interval = interval;
        self.store.set_rotation(cursor);

        if self.is_running() {
            self.stop();
            // stop() resets the cursor but keeps the interval we just set
            self.start();
        }
    }

    /// Manually advance to the next online camera, independent of the
    /// timer.
    pub fn advance(&self) {
        advance_cursor(&self.store);
    }

    pub fn is_running(&self) -> bool {
        self.lock_timer().is_some()
    }

    fn lock_timer(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.timer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

// ── Tick loop ────────────────────────────────────────────────────────

async fn tick_loop(
    store: Arc<DashboardStore>,
    cancel: CancellationToken,
    generation: Arc<AtomicU64>,
    my_generation: u64,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                // Stale-instance guard: a stop/restart that raced this
                // tick invalidates it.
                if generation.load(Ordering::SeqCst) != my_generation {
                    break;
                }
                advance_cursor(&store);
            }
        }
    }

    tracing::debug!("rotation timer exiting");
}

/// Advance the cursor by one position modulo the *current* online set.
///
/// An empty set parks the cursor at `None` rather than keeping a camera
/// id that is no longer eligible.
fn advance_cursor(store: &DashboardStore) {
    let cursor = store.rotation();
    let online = store.online_cameras();

    if online.is_empty() {
        store.set_rotation(RotationCursor {
            camera_id: None,
            index: 0,
            ..cursor
        });
        return;
    }

    let next = (cursor.index + 1) % online.len();
    let next_camera = &online[next];
    tracing::trace!(camera = %next_camera.name, position = next + 1, of = online.len(), "rotating");
    store.set_rotation(RotationCursor {
        index: next,
        camera_id: Some(next_camera.id.clone()),
        ..cursor
    });
}

// ── Tests ────────────────────────────────────────────────────────────
