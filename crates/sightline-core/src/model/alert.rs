// ── Alert / event-log domain types ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Event kind discriminator, matching the wire `type` strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertKind {
    PersonDetected,
    FallDetected,
    LoiterAlert,
    ZoneUpdate,
    CrowdAlert,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// An alert/log entry produced by the inference backend (or the
/// simulation source).
///
/// Mutated only by acknowledgement, which is monotonic: once
/// acknowledged an event never reverts. Individual deletion does not
/// exist; entries leave only through the ledger's bounded retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub camera_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
    pub message: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(default)]
    pub acknowledged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_wire_strings() {
        assert_eq!(
            serde_json::to_string(&AlertKind::FallDetected).unwrap(),
            r#""fall_detected""#
        );
        assert_eq!(AlertKind::LoiterAlert.to_string(), "loiter_alert");
    }

    #[test]
    fn severity_orders_info_to_critical() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
    }

    #[test]
    fn alert_deserializes_wire_payload() {
        let json = r#"{
            "id": "evt-x",
            "type": "fall_detected",
            "severity": "critical",
            "cameraId": "cam-06",
            "message": "Fall detected",
            "timestamp": 1700000000000,
            "acknowledged": false,
            "metadata": { "confidence": 0.94 }
        }"#;
        let evt: AlertEvent = serde_json::from_str(json).unwrap();
        assert_eq!(evt.kind, AlertKind::FallDetected);
        assert_eq!(evt.severity, Severity::Critical);
        assert_eq!(evt.camera_id, "cam-06");
        assert!(!evt.acknowledged);
        assert_eq!(evt.metadata.unwrap()["confidence"], 0.94);
    }
}
