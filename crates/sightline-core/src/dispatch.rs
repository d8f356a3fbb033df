// ── Inbound message dispatcher ──
//
// Routes each decoded wire frame, by kind, to exactly one store
// mutation, and fires the classified notification for alert-like kinds.
// Messages are applied in arrival order; no reordering or coalescing
// happens here (capacity eviction is the ledger's concern).
//
// A payload that does not match its declared kind is dropped with a
// debug log and nothing else: partial or garbled frames must never
// crash the ingestion path, and they are not worth a user-facing toast.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use sightline_api::wire::{
    KIND_CROWD_ALERT, KIND_FALL_DETECTED, KIND_LOITER_ALERT, KIND_PERSON_DETECTED, KIND_ZONE_UPDATE,
};
use sightline_api::WireMessage;

use crate::model::{AlertEvent, DashboardStats, Person, Severity};
use crate::notify::{Notification, Notifier};
use crate::store::DashboardStore;

const FALL_TOAST: Duration = Duration::from_secs(10);
const LOITER_CRITICAL_TOAST: Duration = Duration::from_secs(8);
const LOITER_TOAST: Duration = Duration::from_secs(5);
const CROWD_TOAST: Duration = Duration::from_secs(5);

/// Applies wire messages to the store.
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<DashboardStore>,
    notifier: Notifier,
}

impl Dispatcher {
    pub fn new(store: Arc<DashboardStore>, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    /// Apply one inbound message. Infallible by design: every failure
    /// mode degrades to "frame dropped, debug-logged".
    pub fn apply(&self, msg: &WireMessage) {
        match msg.kind.as_str() {
            KIND_PERSON_DETECTED => {
                // High-frequency; never notifies.
                if let Some(person) = self.decode::<Person>(msg) {
                    self.store.upsert_person(person);
                }
            }

            KIND_FALL_DETECTED => {
                if let Some(event) = self.decode::<AlertEvent>(msg) {
                    self.notifier.notify(Notification::alarm(
                        event.message.clone(),
                        "\u{1f6a8}",
                        FALL_TOAST,
                    ));
                    self.store.add_event(event);
                }
            }

            KIND_LOITER_ALERT => {
                if let Some(event) = self.decode::<AlertEvent>(msg) {
                    let toast = if event.severity == Severity::Critical {
                        Notification::error(event.message.clone(), "\u{26a0}", LOITER_CRITICAL_TOAST)
                    } else {
                        Notification::info(event.message.clone(), "\u{1f441}", LOITER_TOAST)
                    };
                    self.notifier.notify(toast);
                    self.store.add_event(event);
                }
            }

            KIND_CROWD_ALERT => {
                if let Some(event) = self.decode::<AlertEvent>(msg) {
                    let toast = if event.severity == Severity::Critical {
                        Notification::alarm(event.message.clone(), "\u{1f465}", CROWD_TOAST)
                    } else {
                        Notification::info(event.message.clone(), "\u{1f465}", CROWD_TOAST)
                    };
                    self.notifier.notify(toast);
                    self.store.add_event(event);
                }
            }

            KIND_ZONE_UPDATE => {
                if let Some(stats) = self.decode::<DashboardStats>(msg) {
                    self.store.set_stats(stats);
                }
            }

            other => {
                tracing::debug!(kind = other, "dropping message of unknown kind");
            }
        }
    }

    fn decode<T: DeserializeOwned>(&self, msg: &WireMessage) -> Option<T> {
        match serde_json::from_value(msg.payload.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(kind = %msg.kind, error = %e, "dropping malformed payload");
                None
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::Urgency;
    use serde_json::json;
    use sightline_api::wire;

    fn setup() -> (Dispatcher, Arc<DashboardStore>, Notifier) {
        let store = Arc::new(DashboardStore::new());
        let notifier = Notifier::new();
        let dispatcher = Dispatcher::new(Arc::clone(&store), notifier.clone());
        (dispatcher, store, notifier)
    }

    fn message(kind: &str, payload: serde_json::Value) -> WireMessage {
        wire::parse_frame(
            &json!({ "type": kind, "payload": payload, "timestamp": 1_700_000_000_000_i64 })
                .to_string(),
        )
        .unwrap()
    }

    fn fall_payload(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "type": "fall_detected",
            "severity": "critical",
            "cameraId": "cam-06",
            "message": "Fall detected",
            "timestamp": 1_700_000_000_000_i64,
            "acknowledged": false
        })
    }

    #[test]
    fn fall_alert_lands_in_ledger_and_notifies() {
        let (dispatcher, store, notifier) = setup();
        let mut rx = notifier.subscribe();

        dispatcher.apply(&message("fall_detected", fall_payload("evt-x")));

        let events = store.events();
        assert_eq!(events[0].id, "evt-x");
        assert!(!events[0].acknowledged);

        let toast = rx.try_recv().unwrap();
        assert_eq!(toast.urgency, Urgency::Alarm);
        assert_eq!(toast.duration, Duration::from_secs(10));
    }

    #[test]
    fn person_detected_upserts_without_notifying() {
        let (dispatcher, store, notifier) = setup();
        let mut rx = notifier.subscribe();

        let payload = json!({
            "id": "person-1",
            "trackId": "track-1",
            "cameraId": "cam-02",
            "bbox": { "x": 0.1, "y": 0.2, "width": 0.1, "height": 0.2 },
            "confidence": 0.88,
            "timestamp": 1_700_000_000_000_i64
        });
        dispatcher.apply(&message("person_detected", payload.clone()));
        assert!(store.person("person-1").is_some());
        assert!(rx.try_recv().is_err());

        // replace semantics: same id, new position
        let mut updated = payload;
        updated["bbox"]["x"] = json!(0.5);
        dispatcher.apply(&message("person_detected", updated));
        assert_eq!(store.people().len(), 1);
        assert!((store.person("person-1").unwrap().bbox.x - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn loiter_severity_scales_the_toast() {
        let (dispatcher, _store, notifier) = setup();
        let mut rx = notifier.subscribe();

        let mut payload = fall_payload("evt-l1");
        payload["type"] = json!("loiter_alert");
        payload["severity"] = json!("warning");
        dispatcher.apply(&message("loiter_alert", payload));

        let toast = rx.try_recv().unwrap();
        assert_eq!(toast.urgency, Urgency::Info);
        assert_eq!(toast.duration, Duration::from_secs(5));

        let mut payload = fall_payload("evt-l2");
        payload["type"] = json!("loiter_alert");
        dispatcher.apply(&message("loiter_alert", payload));

        let toast = rx.try_recv().unwrap();
        assert_eq!(toast.urgency, Urgency::Error);
        assert_eq!(toast.duration, Duration::from_secs(8));
    }

    #[test]
    fn zone_update_replaces_stats_wholesale() {
        let (dispatcher, store, _notifier) = setup();

        let payload = json!({
            "totalPeopleNow": 12,
            "totalDetectionsToday": 300,
            "alertsToday": 4,
            "criticalAlertsToday": 1,
            "fallsDetected": 0,
            "loiteringIncidents": 2,
            "avgDwellTime": 80.5,
            "peakHour": "11:00"
        });
        dispatcher.apply(&message("zone_update", payload));

        let stats = store.stats().unwrap();
        assert_eq!(stats.total_people_now, 12);
        assert_eq!(stats.peak_hour, "11:00");
    }

    #[test]
    fn unknown_kind_is_dropped_silently() {
        let (dispatcher, store, notifier) = setup();
        let mut rx = notifier.subscribe();

        dispatcher.apply(&message("telemetry_v2", json!({ "whatever": true })));

        assert_eq!(store.event_count(), 0);
        assert!(store.people().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn malformed_payload_is_dropped_silently() {
        let (dispatcher, store, notifier) = setup();
        let mut rx = notifier.subscribe();

        dispatcher.apply(&message("fall_detected", json!("not an object")));
        dispatcher.apply(&message("person_detected", json!({ "id": 42 })));

        assert_eq!(store.event_count(), 0);
        assert!(store.people().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn messages_apply_in_arrival_order() {
        let (dispatcher, store, _notifier) = setup();

        for i in 1..=3 {
            dispatcher.apply(&message("fall_detected", fall_payload(&format!("evt-{i}"))));
        }

        let events = store.events();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["evt-3", "evt-2", "evt-1"]);
    }
}
