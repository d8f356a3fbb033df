//! Persisted configuration for the Sightline dashboard.
//!
//! A small TOML file (plus `SIGHTLINE_*` environment overrides) holding
//! what survives a reload: the selected camera ids, the discovery
//! gateway URL, the event-link URL, the AI-model enabled set with its
//! operation mode, and a couple of tuning knobs. An absent key means
//! "use the default". Read once at startup to seed the store; written
//! by the embedding application on every relevant change.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sightline_core::model::OperationMode;
use sightline_core::store::DashboardStore;
use sightline_core::{EngineConfig, DEFAULT_DISCOVERY_URL, DEFAULT_WS_URL};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config structs ──────────────────────────────────────────────────

/// One persisted model toggle.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelToggle {
    pub id: String,
    pub enabled: bool,
}

/// Top-level persisted configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Stream gateway base URL for camera discovery.
    #[serde(default = "default_discovery_url")]
    pub discovery_url: String,

    /// Event link endpoint.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    /// Stream ids selected during camera setup.
    #[serde(default)]
    pub selected_cameras: Vec<String>,

    /// Per-model enabled flags. Models not listed keep their catalog
    /// default.
    #[serde(default)]
    pub models: Vec<ModelToggle>,

    /// Active operation mode.
    #[serde(default = "default_mode")]
    pub mode: OperationMode,

    /// Camera rotation cadence in milliseconds.
    #[serde(default = "default_rotation_interval_ms")]
    pub rotation_interval_ms: u64,

    /// Person-track staleness window in seconds.
    #[serde(default = "default_person_ttl_secs")]
    pub person_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discovery_url: default_discovery_url(),
            ws_url: default_ws_url(),
            selected_cameras: Vec::new(),
            models: Vec::new(),
            mode: default_mode(),
            rotation_interval_ms: default_rotation_interval_ms(),
            person_ttl_secs: default_person_ttl_secs(),
        }
    }
}

fn default_discovery_url() -> String {
    DEFAULT_DISCOVERY_URL.into()
}
fn default_ws_url() -> String {
    DEFAULT_WS_URL.into()
}
fn default_mode() -> OperationMode {
    OperationMode::Crowd
}
fn default_rotation_interval_ms() -> u64 {
    400
}
fn default_person_ttl_secs() -> u64 {
    10
}

impl Config {
    /// Translate into an [`EngineConfig`], validating the URLs.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let ws_url = self.ws_url.parse().map_err(|_| ConfigError::Validation {
            field: "ws_url".into(),
            reason: format!("invalid URL: {}", self.ws_url),
        })?;
        let discovery_url = self
            .discovery_url
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: "discovery_url".into(),
                reason: format!("invalid URL: {}", self.discovery_url),
            })?;

        Ok(EngineConfig {
            ws_url,
            discovery_url,
            person_ttl: Duration::from_secs(self.person_ttl_secs),
        })
    }

    /// Apply the persisted model state to a fresh store.
    ///
    /// A preset mode is reapplied through the preset table (so the
    /// enabled set always matches the preset definition); a persisted
    /// `custom` mode replays the saved per-model toggles instead.
    pub fn seed_models(&self, store: &DashboardStore) {
        if self.mode == OperationMode::Custom {
            for toggle in &self.models {
                let currently_enabled = store
                    .models()
                    .iter()
                    .find(|m| m.id == toggle.id)
                    .map(|m| m.enabled);
                if currently_enabled.is_some_and(|e| e != toggle.enabled) {
                    store.toggle_model(&toggle.id);
                }
            }
            store.set_operation_mode(OperationMode::Custom);
        } else {
            store.set_operation_mode(self.mode);
        }
    }

    /// Snapshot the store's model state back into the config for
    /// persistence.
    pub fn capture_models(&mut self, store: &DashboardStore) {
        self.models = store
            .models()
            .iter()
            .map(|m| ModelToggle {
                id: m.id.clone(),
                enabled: m.enabled,
            })
            .collect();
        self.mode = store.current_mode();
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "sightline", "sightline").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("sightline");
    p
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit path + environment. Missing file means
/// defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SIGHTLINE_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load, falling back to defaults on any error.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Saving ──────────────────────────────────────────────────────────

/// Serialize to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize to TOML and write to an explicit path, creating parent
/// directories as needed.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("nope.toml")).unwrap();

        assert_eq!(config.discovery_url, DEFAULT_DISCOVERY_URL);
        assert_eq!(config.ws_url, DEFAULT_WS_URL);
        assert!(config.selected_cameras.is_empty());
        assert_eq!(config.mode, OperationMode::Crowd);
        assert_eq!(config.rotation_interval_ms, 400);
        assert_eq!(config.person_ttl_secs, 10);
    }

    #[test]
    fn save_and_reload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.selected_cameras = vec!["front-door".into(), "lobby".into()];
        config.mode = OperationMode::Security;
        config.rotation_interval_ms = 250;
        save_config_to(&config, &path).unwrap();

        let reloaded = load_config_from(&path).unwrap();
        assert_eq!(reloaded.selected_cameras, vec!["front-door", "lobby"]);
        assert_eq!(reloaded.mode, OperationMode::Security);
        assert_eq!(reloaded.rotation_interval_ms, 250);
    }

    #[test]
    fn partial_file_keeps_defaults_for_absent_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "discovery_url = \"http://10.0.0.5:1984\"\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.discovery_url, "http://10.0.0.5:1984");
        assert_eq!(config.ws_url, DEFAULT_WS_URL);
        assert_eq!(config.person_ttl_secs, 10);
    }

    #[test]
    fn engine_config_rejects_bad_urls() {
        let mut config = Config::default();
        config.ws_url = "not a url".into();
        assert!(matches!(
            config.engine_config(),
            Err(ConfigError::Validation { .. })
        ));

        let config = Config::default();
        let engine = config.engine_config().unwrap();
        assert_eq!(engine.person_ttl, Duration::from_secs(10));
    }

    #[test]
    fn preset_mode_seeds_through_the_preset_table() {
        let store = DashboardStore::new();
        let mut config = Config::default();
        config.mode = OperationMode::Performance;
        config.seed_models(&store);

        assert_eq!(store.current_mode(), OperationMode::Performance);
        let enabled: Vec<String> = store.active_models().iter().map(|m| m.id.clone()).collect();
        assert_eq!(enabled, vec!["yolo"]);
    }

    #[test]
    fn custom_mode_replays_saved_toggles() {
        let store = DashboardStore::new();
        let mut config = Config::default();
        config.mode = OperationMode::Custom;
        config.models = vec![
            ModelToggle { id: "yolo".into(), enabled: false },
            ModelToggle { id: "face".into(), enabled: true },
            ModelToggle { id: "ghost".into(), enabled: true },
        ];
        config.seed_models(&store);

        assert_eq!(store.current_mode(), OperationMode::Custom);
        let enabled: Vec<String> = store.active_models().iter().map(|m| m.id.clone()).collect();
        // catalog default: yolo+pose enabled; yolo turned off, face on
        assert_eq!(enabled, vec!["pose", "face"]);
    }

    #[test]
    fn capture_models_round_trips_store_state() {
        let store = DashboardStore::new();
        store.set_operation_mode(OperationMode::Access);

        let mut config = Config::default();
        config.capture_models(&store);
        assert_eq!(config.mode, OperationMode::Access);
        let face = config.models.iter().find(|m| m.id == "face").unwrap();
        assert!(face.enabled);
        let yolo = config.models.iter().find(|m| m.id == "yolo").unwrap();
        assert!(!yolo.enabled);
    }
}
