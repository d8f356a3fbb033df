// ── Bounded alert ledger ──
//
// Newest-first alert history with capacity eviction from the tail.
// Acknowledgement is monotonic; eviction is silent and never rejects an
// insertion.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::{AlertEvent, AlertKind};

/// Default retention: the 100 most recent alerts.
pub const DEFAULT_EVENT_CAP: usize = 100;

/// Capacity-bounded, newest-first alert log.
///
/// The backing vec lives inside the `watch` sender, so every mutation is
/// atomic with respect to readers and immediately visible to
/// subscribers.
pub(crate) struct EventLedger {
    snapshot: watch::Sender<Arc<Vec<Arc<AlertEvent>>>>,
    cap: usize,
}

impl EventLedger {
    pub(crate) fn new(cap: usize) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self { snapshot, cap }
    }

    /// Prepend an alert, then truncate to capacity. The survivors are
    /// always the `cap` most recent insertions, newest first.
    pub(crate) fn push(&self, event: AlertEvent) {
        self.snapshot.send_modify(|snap| {
            let mut next = Vec::with_capacity(snap.len().saturating_add(1).min(self.cap));
            next.push(Arc::new(event));
            next.extend(snap.iter().take(self.cap.saturating_sub(1)).cloned());
            next.truncate(self.cap);
            *snap = Arc::new(next);
        });
    }

    /// Flip an alert to acknowledged. Monotonic: a no-op (returning
    /// `false`) if the id is unknown or the alert is already
    /// acknowledged. Never changes length or order.
    pub(crate) fn acknowledge(&self, id: &str) -> bool {
        self.snapshot.send_if_modified(|snap| {
            let Some(pos) = snap.iter().position(|e| e.id == id) else {
                return false;
            };
            if snap[pos].acknowledged {
                return false;
            }

            let mut next: Vec<Arc<AlertEvent>> = snap.as_ref().clone();
            let mut event = (*next[pos]).clone();
            event.acknowledged = true;
            next[pos] = Arc::new(event);
            *snap = Arc::new(next);
            true
        })
    }

    /// Replace the whole ledger (seeding), truncated to capacity.
    /// `events` are taken newest-first, same as the live ordering.
    pub(crate) fn replace_all(&self, events: Vec<AlertEvent>) {
        let next: Vec<Arc<AlertEvent>> = events.into_iter().take(self.cap).map(Arc::new).collect();
        self.snapshot.send_modify(|snap| *snap = Arc::new(next));
    }

    pub(crate) fn clear(&self) {
        self.snapshot.send_modify(|snap| *snap = Arc::new(Vec::new()));
    }

    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<AlertEvent>>> {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<AlertEvent>>>> {
        self.snapshot.subscribe()
    }

    /// Read-side view filtered by kind; no structural mutation.
    pub(crate) fn filtered(&self, kinds: &[AlertKind]) -> Vec<Arc<AlertEvent>> {
        self.snapshot
            .borrow()
            .iter()
            .filter(|e| kinds.contains(&e.kind))
            .cloned()
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Severity;

    fn alert(id: &str, kind: AlertKind) -> AlertEvent {
        AlertEvent {
            id: id.into(),
            kind,
            severity: Severity::Warning,
            camera_id: "cam-01".into(),
            zone_id: None,
            person_id: None,
            message: format!("alert {id}"),
            timestamp: 1_700_000_000_000,
            acknowledged: false,
            snapshot_url: None,
            metadata: None,
        }
    }

    #[test]
    fn push_prepends_newest_first() {
        let ledger = EventLedger::new(DEFAULT_EVENT_CAP);
        ledger.push(alert("e1", AlertKind::CrowdAlert));
        ledger.push(alert("e2", AlertKind::FallDetected));

        let snap = ledger.snapshot();
        assert_eq!(snap[0].id, "e2");
        assert_eq!(snap[1].id, "e1");
    }

    #[test]
    fn capacity_eviction_drops_oldest() {
        let ledger = EventLedger::new(DEFAULT_EVENT_CAP);
        for i in 1..=105 {
            ledger.push(alert(&format!("e{i}"), AlertKind::LoiterAlert));
        }

        let snap = ledger.snapshot();
        assert_eq!(snap.len(), 100);
        // e105..e6 newest-first; e1..e5 evicted
        assert_eq!(snap[0].id, "e105");
        assert_eq!(snap[99].id, "e6");
        assert!(!snap.iter().any(|e| e.id == "e5"));
    }

    #[test]
    fn acknowledge_is_monotonic_and_order_preserving() {
        let ledger = EventLedger::new(DEFAULT_EVENT_CAP);
        ledger.push(alert("a", AlertKind::FallDetected));
        ledger.push(alert("b", AlertKind::CrowdAlert));

        assert!(ledger.acknowledge("a"));
        // second acknowledge is a no-op
        assert!(!ledger.acknowledge("a"));
        // unknown id is a no-op
        assert!(!ledger.acknowledge("ghost"));

        let snap = ledger.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].id, "b");
        assert_eq!(snap[1].id, "a");
        assert!(snap[1].acknowledged);
        assert!(!snap[0].acknowledged);
    }

    #[test]
    fn filtered_is_a_pure_view() {
        let ledger = EventLedger::new(DEFAULT_EVENT_CAP);
        ledger.push(alert("a", AlertKind::FallDetected));
        ledger.push(alert("b", AlertKind::PersonDetected));
        ledger.push(alert("c", AlertKind::CrowdAlert));

        let view = ledger.filtered(&[AlertKind::FallDetected, AlertKind::CrowdAlert]);
        let ids: Vec<&str> = view.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
        // underlying ledger untouched
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn replace_all_truncates_to_cap() {
        let ledger = EventLedger::new(3);
        ledger.replace_all((1..=5).map(|i| alert(&format!("e{i}"), AlertKind::CrowdAlert)).collect());
        let snap = ledger.snapshot();
        assert_eq!(snap.len(), 3);
        assert_eq!(snap[0].id, "e1");
    }
}
