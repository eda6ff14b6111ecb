//! Application configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{JitterError, JitterResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Well-known files shared with the engine.
    pub paths: PathsConfig,

    /// Threshold search settings.
    pub tuning: TuningSettings,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Locations of the engine and the two files it exchanges with us.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Log written by the engine on every run.
    pub log_file: PathBuf,

    /// Handoff file read by the engine at startup.
    pub config_file: PathBuf,

    /// Engine executable (literal path or a name resolved on PATH).
    pub engine: PathBuf,

    /// Working directory for the engine process. Inherited when unset.
    pub working_dir: Option<PathBuf>,
}

/// Suppression parameters for one bone, or for the whole rig.
///
/// Field names follow the engine's handoff format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdParams {
    /// Positional jitter threshold.
    pub t: f64,

    /// Rotation tolerance in degrees.
    #[serde(rename = "rDeg")]
    pub r_deg: f64,

    /// Smoothing window size in frames.
    pub window: u32,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            t: 0.0020,
            r_deg: 0.35,
            window: 2,
        }
    }
}

/// What the search does when a single trial fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the whole sweep on the first failed trial.
    #[default]
    Abort,
    /// Log the failure and move on to the next trial.
    Continue,
}

/// Threshold search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningSettings {
    /// Animations to tune, in order.
    pub animations: Vec<String>,

    /// Candidate positional thresholds.
    pub thresholds: Vec<f64>,

    /// Candidate rotation tolerances (degrees).
    pub rotation_degrees: Vec<f64>,

    /// Candidate smoothing windows.
    pub windows: Vec<u32>,

    /// Per-bone pinned parameters, passed through unchanged to every trial.
    pub overrides: BTreeMap<String, ThresholdParams>,

    /// Kill the engine after this many seconds. `None` waits forever.
    pub engine_timeout_secs: Option<u64>,

    pub failure_policy: FailurePolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "jitterscope_tuning=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path. Logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("output.txt"),
            config_file: PathBuf::from("jitter_config.json"),
            engine: PathBuf::from("OpenEngine.exe"),
            working_dir: None,
        }
    }
}

impl Default for TuningSettings {
    fn default() -> Self {
        Self {
            animations: vec!["animations/Stance1.fbx".to_string()],
            thresholds: vec![0.0015, 0.0020, 0.0030],
            rotation_degrees: vec![0.25, 0.35, 0.50],
            windows: vec![2],
            overrides: BTreeMap::new(),
            engine_timeout_secs: None,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path. Unlike [`AppConfig::load`], a
    /// missing or malformed file is an error.
    pub fn load_from(path: &Path) -> JitterResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| JitterError::config(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| JitterError::config(format!("cannot parse {}: {e}", path.display())))
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("jitterscope").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_grid() {
        let config = AppConfig::default();
        assert_eq!(config.paths.log_file, PathBuf::from("output.txt"));
        assert_eq!(config.paths.config_file, PathBuf::from("jitter_config.json"));
        assert_eq!(config.tuning.thresholds, vec![0.0015, 0.0020, 0.0030]);
        assert_eq!(config.tuning.rotation_degrees, vec![0.25, 0.35, 0.50]);
        assert_eq!(config.tuning.windows, vec![2]);
        assert!(config.tuning.overrides.is_empty());
        assert_eq!(config.tuning.failure_policy, FailurePolicy::Abort);
        assert_eq!(config.tuning.engine_timeout_secs, None);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"tuning":{"animations":["Walk","Run"],"failure_policy":"continue"}}"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.tuning.animations, vec!["Walk", "Run"]);
        assert_eq!(config.tuning.failure_policy, FailurePolicy::Continue);
        assert_eq!(config.tuning.windows, vec![2]);
        assert_eq!(config.paths.engine, PathBuf::from("OpenEngine.exe"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn explicit_path_that_does_not_parse_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, JitterError::Config { .. }));
    }

    #[test]
    fn threshold_params_use_handoff_field_names() {
        let json = serde_json::to_string(&ThresholdParams::default()).unwrap();
        assert!(json.contains("\"t\":0.002"));
        assert!(json.contains("\"rDeg\":0.35"));
        assert!(json.contains("\"window\":2"));
    }
}
