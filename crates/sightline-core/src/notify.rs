// ── User-visible notifications ──
//
// Transient, classified toasts emitted by the dispatcher and the live
// link. This is an output effect, not a queryable interface: the
// embedding UI subscribes to the broadcast channel and renders whatever
// arrives. A full channel just drops the oldest notification.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

const NOTIFICATION_CHANNEL_CAPACITY: usize = 64;

/// How the UI should style a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Info,
    Success,
    Error,
    /// High-urgency styling for alerts needing immediate attention.
    Alarm,
}

/// One transient user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub urgency: Urgency,
    pub message: String,
    pub icon: &'static str,
    /// How long the UI should keep it on screen.
    pub duration: Duration,
}

impl Notification {
    pub fn info(message: impl Into<String>, icon: &'static str, duration: Duration) -> Self {
        Self {
            urgency: Urgency::Info,
            message: message.into(),
            icon,
            duration,
        }
    }

    pub fn success(message: impl Into<String>, icon: &'static str) -> Self {
        Self {
            urgency: Urgency::Success,
            message: message.into(),
            icon,
            duration: Duration::from_secs(4),
        }
    }

    pub fn error(message: impl Into<String>, icon: &'static str, duration: Duration) -> Self {
        Self {
            urgency: Urgency::Error,
            message: message.into(),
            icon,
            duration,
        }
    }

    pub fn alarm(message: impl Into<String>, icon: &'static str, duration: Duration) -> Self {
        Self {
            urgency: Urgency::Alarm,
            message: message.into(),
            icon,
            duration,
        }
    }
}

/// Fan-out handle for notifications.
///
/// Cheap to clone; send errors (no subscribers) are ignored, since a
/// headless embedding is perfectly valid.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Arc<Notification>>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(NOTIFICATION_CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn notify(&self, notification: Notification) {
        let _ = self.tx.send(Arc::new(notification));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Notification>> {
        self.tx.subscribe()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_receive_notifications() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();

        notifier.notify(Notification::success("Connected", "\u{1f50c}"));

        let n = rx.try_recv().unwrap();
        assert_eq!(n.urgency, Urgency::Success);
        assert_eq!(n.message, "Connected");
    }

    #[test]
    fn notify_without_subscribers_does_not_panic() {
        let notifier = Notifier::new();
        notifier.notify(Notification::info(
            "nobody listening",
            "\u{1f441}",
            Duration::from_secs(5),
        ));
    }
}
