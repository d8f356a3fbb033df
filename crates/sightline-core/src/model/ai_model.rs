// ── AI model catalog and operation modes ──
//
// The model set is a small fixed catalog. An operation mode is a preset
// selection over that catalog; manually toggling any single model moves
// the active mode to the `custom` sentinel until a preset is reselected.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Idle,
    Running,
    Loading,
    Error,
}

/// One inference model the edge device can run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiModel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub enabled: bool,
    /// Measured FPS while running; `None` when the model is not active.
    pub fps: Option<f64>,
    pub status: ModelStatus,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OperationMode {
    Security,
    Crowd,
    Access,
    Performance,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    High,
    Medium,
    Low,
}

/// A named preset: which models a mode enables, and how chatty it is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModePreset {
    pub id: OperationMode,
    pub name: String,
    pub description: String,
    pub icon: String,
    /// Model ids this preset enables. Empty for the `custom` sentinel,
    /// which preserves whatever the user toggled by hand.
    pub models: Vec<String>,
    pub alert_level: AlertLevel,
}

/// The fixed model catalog, in display order.
pub fn default_models() -> Vec<AiModel> {
    vec![
        AiModel {
            id: "yolo".into(),
            name: "Object Detection".into(),
            description: "YOLOv8n - People, vehicles, objects".into(),
            icon: "\u{1f3af}".into(),
            enabled: true,
            fps: None,
            status: ModelStatus::Idle,
        },
        AiModel {
            id: "pose".into(),
            name: "Pose Estimation".into(),
            description: "YOLOv8n-pose - Skeleton/fall detection".into(),
            icon: "\u{1f9b4}".into(),
            enabled: true,
            fps: None,
            status: ModelStatus::Idle,
        },
        AiModel {
            id: "face".into(),
            name: "Face Detection".into(),
            description: "SCRFD - Face tracking".into(),
            icon: "\u{1f464}".into(),
            enabled: false,
            fps: None,
            status: ModelStatus::Idle,
        },
        AiModel {
            id: "lpr".into(),
            name: "License Plate".into(),
            description: "LPRNet - Vehicle plates".into(),
            icon: "\u{1f697}".into(),
            enabled: false,
            fps: None,
            status: ModelStatus::Idle,
        },
    ]
}

/// The operation-mode preset table, in display order.
pub fn mode_presets() -> Vec<ModePreset> {
    vec![
        ModePreset {
            id: OperationMode::Security,
            name: "Security Mode".into(),
            description: "All models, max alerts".into(),
            icon: "\u{1f512}".into(),
            models: vec!["yolo".into(), "pose".into(), "face".into(), "lpr".into()],
            alert_level: AlertLevel::High,
        },
        ModePreset {
            id: OperationMode::Crowd,
            name: "Crowd Analytics".into(),
            description: "Detection + pose for counting".into(),
            icon: "\u{1f465}".into(),
            models: vec!["yolo".into(), "pose".into()],
            alert_level: AlertLevel::Medium,
        },
        ModePreset {
            id: OperationMode::Access,
            name: "Access Control".into(),
            description: "Face + LPR only".into(),
            icon: "\u{1f6aa}".into(),
            models: vec!["face".into(), "lpr".into()],
            alert_level: AlertLevel::Medium,
        },
        ModePreset {
            id: OperationMode::Performance,
            name: "Performance Mode".into(),
            description: "Detection only, max FPS".into(),
            icon: "\u{26a1}".into(),
            models: vec!["yolo".into()],
            alert_level: AlertLevel::Low,
        },
        ModePreset {
            id: OperationMode::Custom,
            name: "Custom".into(),
            description: "Your toggle selections".into(),
            icon: "\u{2699}".into(),
            models: Vec::new(),
            alert_level: AlertLevel::Medium,
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn catalog_has_the_four_fixed_models() {
        let models = default_models();
        let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["yolo", "pose", "face", "lpr"]);
        assert!(models[0].enabled);
        assert!(models[1].enabled);
        assert!(!models[2].enabled);
        assert!(!models[3].enabled);
    }

    #[test]
    fn every_mode_has_a_preset() {
        let presets = mode_presets();
        for mode in [
            OperationMode::Security,
            OperationMode::Crowd,
            OperationMode::Access,
            OperationMode::Performance,
            OperationMode::Custom,
        ] {
            assert!(presets.iter().any(|p| p.id == mode), "missing {mode}");
        }
    }

    #[test]
    fn mode_parses_from_lowercase_string() {
        assert_eq!(
            OperationMode::from_str("performance").unwrap(),
            OperationMode::Performance
        );
        assert_eq!(OperationMode::Crowd.to_string(), "crowd");
    }
}
