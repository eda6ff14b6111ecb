//! Configuration file handed to the engine before each trial.
//!
//! Shape on disk:
//!
//! ```json
//! { "default": { "t": 0.002, "rDeg": 0.35, "window": 2 },
//!   "overrides": { "DEF-toe.L": { "t": 0.001, "rDeg": 0.25, "window": 3 } } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use jitterscope_common::config::ThresholdParams;
use jitterscope_common::error::{JitterError, JitterResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JitterConfig {
    /// Parameters applied to every bone without an override.
    pub default: ThresholdParams,

    /// Per-bone pinned parameters.
    #[serde(default)]
    pub overrides: BTreeMap<String, ThresholdParams>,
}

impl JitterConfig {
    pub fn new(default: ThresholdParams) -> Self {
        Self {
            default,
            overrides: BTreeMap::new(),
        }
    }

    pub fn with_overrides(mut self, overrides: BTreeMap<String, ThresholdParams>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Replace the file at `path` with this config.
    pub fn write_to(&self, path: &Path) -> JitterResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| JitterError::WriteConfig {
                path: path.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, json).map_err(|source| JitterError::WriteConfig {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_only_config_has_empty_overrides_object() {
        let config = JitterConfig::new(ThresholdParams {
            t: 0.0015,
            r_deg: 0.25,
            window: 2,
        });
        let value: serde_json::Value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["default"]["t"], 0.0015);
        assert_eq!(value["default"]["rDeg"], 0.25);
        assert_eq!(value["default"]["window"], 2);
        assert_eq!(value["overrides"], serde_json::json!({}));
    }

    #[test]
    fn overrides_are_keyed_by_bone_name() {
        let pinned = ThresholdParams {
            t: 0.001,
            r_deg: 0.1,
            window: 4,
        };
        let config = JitterConfig::new(ThresholdParams::default())
            .with_overrides(BTreeMap::from([("DEF-toe.L".to_string(), pinned)]));

        let value: serde_json::Value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["overrides"]["DEF-toe.L"]["t"], 0.001);
        assert_eq!(value["overrides"]["DEF-toe.L"]["window"], 4);
        assert_eq!(value["default"]["t"], 0.002);
        assert!(value["overrides"].get("root").is_none());
    }

    #[test]
    fn write_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jitter_config.json");
        std::fs::write(&path, "stale contents that are much longer than the config").unwrap();

        let config = JitterConfig::new(ThresholdParams::default());
        config.write_to(&path).unwrap();

        let parsed: JitterConfig =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
