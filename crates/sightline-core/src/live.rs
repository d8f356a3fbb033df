// ── Live data source supervisor ──
//
// Owns the WebSocket link while live mode is active: one pump task
// feeding inbound frames to the dispatcher, one watcher translating
// link-state transitions into the store's link-up flag and the
// user-facing connection notifications.
//
// Notification policy: one success toast on the first established
// connection, one error toast when an established link drops. Individual
// retry attempts stay silent -- a flaky backend must not become a
// notification storm.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use url::Url;

use sightline_api::websocket::{LinkState, ReconnectConfig, WsLink};

use crate::dispatch::Dispatcher;
use crate::notify::{Notification, Notifier};
use crate::store::DashboardStore;

/// Handle to the running live producer.
///
/// Stopping cancels the link (including any pending reconnect timer)
/// and both worker tasks. Idempotent.
pub(crate) struct LiveSource {
    cancel: CancellationToken,
}

impl LiveSource {
    pub(crate) fn start(
        url: Url,
        store: Arc<DashboardStore>,
        dispatcher: Dispatcher,
        notifier: Notifier,
        cancel: CancellationToken,
    ) -> Self {
        let link = WsLink::connect(url, ReconnectConfig::default(), cancel.clone());

        let frames = link.subscribe();
        let pump_cancel = cancel.clone();
        tokio::spawn(async move {
            pump_frames(frames, dispatcher, pump_cancel).await;
        });

        let states = link.state();
        let watch_cancel = cancel.clone();
        tokio::spawn(async move {
            watch_link_state(states, store, notifier, watch_cancel).await;
        });

        Self { cancel }
    }

    pub(crate) fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for LiveSource {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ── Frame pump ───────────────────────────────────────────────────────

async fn pump_frames(
    mut frames: broadcast::Receiver<Arc<sightline_api::WireMessage>>,
    dispatcher: Dispatcher,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            frame = frames.recv() => {
                match frame {
                    Ok(msg) => dispatcher.apply(&msg),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "frame consumer lagged, messages dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("frame pump exiting");
}

// ── Link state watcher ───────────────────────────────────────────────

async fn watch_link_state(
    mut states: tokio::sync::watch::Receiver<LinkState>,
    store: Arc<DashboardStore>,
    notifier: Notifier,
    cancel: CancellationToken,
) {
    let mut previous = states.borrow().clone();
    let mut policy = NotifyPolicy::default();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = states.borrow_and_update().clone();
                apply_transition(&previous, &current, &mut policy, &store, &notifier);
                previous = current;
            }
        }
    }

    store.set_link_up(false);
    tracing::debug!("link state watcher exiting");
}

/// One-shot latches for the connection notifications.
#[derive(Default)]
struct NotifyPolicy {
    has_connected: bool,
    startup_failure_notified: bool,
}

/// Translate one state transition into store/notification effects.
fn apply_transition(
    previous: &LinkState,
    current: &LinkState,
    policy: &mut NotifyPolicy,
    store: &DashboardStore,
    notifier: &Notifier,
) {
    store.set_link_up(current.is_connected());

    match current {
        LinkState::Connected => {
            if !policy.has_connected {
                policy.has_connected = true;
                notifier.notify(Notification::success(
                    "Connected to inference backend",
                    "\u{1f50c}",
                ));
            }
        }
        LinkState::Disconnected if previous.is_connected() => {
            // An established link dropped: surface it once. The retry
            // loop that follows stays silent.
            notifier.notify(Notification::error(
                "Connection to inference backend lost",
                "\u{1f50c}",
                std::time::Duration::from_secs(5),
            ));
        }
        LinkState::Disconnected
            if !policy.has_connected
                && !policy.startup_failure_notified
                && matches!(previous, LinkState::Connecting) =>
        {
            // The very first attempt failed: say so once, then retry
            // quietly.
            policy.startup_failure_notified = true;
            notifier.notify(Notification::error(
                "Cannot reach inference backend",
                "\u{1f50c}",
                std::time::Duration::from_secs(5),
            ));
        }
        _ => {}
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::Urgency;

    fn setup() -> (Arc<DashboardStore>, Notifier) {
        (Arc::new(DashboardStore::new()), Notifier::new())
    }

    #[test]
    fn first_connect_notifies_success_once() {
        let (store, notifier) = setup();
        let mut rx = notifier.subscribe();
        let mut policy = NotifyPolicy::default();

        apply_transition(
            &LinkState::Connecting,
            &LinkState::Connected,
            &mut policy,
            &store,
            &notifier,
        );
        assert!(store.link_up());
        assert_eq!(rx.try_recv().unwrap().urgency, Urgency::Success);

        // reconnect success after a drop is silent
        apply_transition(
            &LinkState::Reconnecting { attempt: 1 },
            &LinkState::Connected,
            &mut policy,
            &store,
            &notifier,
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_link_notifies_error_once() {
        let (store, notifier) = setup();
        let mut rx = notifier.subscribe();
        let mut policy = NotifyPolicy {
            has_connected: true,
            startup_failure_notified: false,
        };

        apply_transition(
            &LinkState::Connected,
            &LinkState::Disconnected,
            &mut policy,
            &store,
            &notifier,
        );
        assert!(!store.link_up());
        assert_eq!(rx.try_recv().unwrap().urgency, Urgency::Error);

        // subsequent retry attempts are silent
        apply_transition(
            &LinkState::Disconnected,
            &LinkState::Reconnecting { attempt: 1 },
            &mut policy,
            &store,
            &notifier,
        );
        apply_transition(
            &LinkState::Reconnecting { attempt: 1 },
            &LinkState::Disconnected,
            &mut policy,
            &store,
            &notifier,
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unreachable_backend_notifies_once_then_retries_quietly() {
        let (store, notifier) = setup();
        let mut rx = notifier.subscribe();
        let mut policy = NotifyPolicy::default();

        // first attempt fails
        apply_transition(
            &LinkState::Connecting,
            &LinkState::Disconnected,
            &mut policy,
            &store,
            &notifier,
        );
        assert_eq!(rx.try_recv().unwrap().urgency, Urgency::Error);

        // every following retry cycle is silent
        for attempt in 1..4 {
            apply_transition(
                &LinkState::Disconnected,
                &LinkState::Reconnecting { attempt },
                &mut policy,
                &store,
                &notifier,
            );
            apply_transition(
                &LinkState::Reconnecting { attempt },
                &LinkState::Disconnected,
                &mut policy,
                &store,
                &notifier,
            );
        }
        assert!(rx.try_recv().is_err());
    }
}
