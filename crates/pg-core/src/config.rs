//! Core configuration
//!
//! Global settings for one plaything, read once at start-up from
//! `{base}/core_config.json` with an optional per-plaything override at
//! `{base}/{plaything}/core_config.json` merged on top.

use pg_assets::{empty_object, merge_json, read_json_value};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// File name of the core configuration document (also excluded from
/// specification discovery)
pub const CORE_CONFIG_FILE: &str = "core_config.json";

/// Activity logging settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    /// Write activity records to the document store
    pub enabled: bool,
    /// Database name
    pub database: Option<String>,
    /// Container name (partitioned by plaything name)
    pub container: Option<String>,
}

/// Global plaything settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Prefix URL paths with `/{plaything}`
    pub plaything_name_in_path: bool,
    /// Enable the keep-warm timer ping
    pub keep_warm: bool,
    /// Also write activity records to the process log
    pub relay_activity: bool,
    /// Document-store activity logging
    pub activity: ActivityConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            plaything_name_in_path: false,
            keep_warm: false,
            relay_activity: true,
            activity: ActivityConfig::default(),
        }
    }
}

impl CoreConfig {
    /// Interpret a JSON document, falling back to defaults if it does not fit
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match serde_json::from_value(value.clone()) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Core configuration is defective ({}); using defaults.", e);
                Self::default()
            }
        }
    }

    /// Load the layered configuration for `plaything` under `config_base`
    #[must_use]
    pub fn load(config_base: &Path, plaything: &str) -> Self {
        let global = read_json_value(config_base.join(CORE_CONFIG_FILE));

        let override_path = config_base.join(plaything).join(CORE_CONFIG_FILE);
        let merged = if override_path.exists() {
            tracing::info!("Applying plaything override from {}", override_path.display());
            merge_json(&global, &read_json_value(&override_path))
        } else {
            global
        };

        // a non-object document (e.g. `[]`) has nothing to offer
        if merged.is_object() {
            Self::from_value(&merged)
        } else {
            Self::from_value(&empty_object())
        }
    }

    /// URL path prefix: empty, or `/` + lowercased plaything name
    #[must_use]
    pub fn plaything_root(&self, plaything: &str) -> String {
        if self.plaything_name_in_path {
            format!("/{}", plaything.to_lowercase())
        } else {
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_for_empty_document() {
        let config = CoreConfig::from_value(&json!({}));
        assert_eq!(config, CoreConfig::default());
        assert!(config.relay_activity);
        assert!(!config.activity.enabled);
    }

    #[test]
    fn defective_document_falls_back() {
        let config = CoreConfig::from_value(&json!({"keep_warm": "yes"}));
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn reads_activity_settings() {
        let config = CoreConfig::from_value(&json!({
            "activity": {"enabled": true, "database": "pg", "container": "events"},
            "plaything_name_in_path": true
        }));
        assert!(config.activity.enabled);
        assert_eq!(config.activity.database.as_deref(), Some("pg"));
        assert_eq!(config.plaything_root("Quiz"), "/quiz");
    }

    #[test]
    fn layered_load_merges_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CORE_CONFIG_FILE),
            r#"{"keep_warm": true, "activity": {"enabled": false, "database": "pg"}}"#,
        )
        .unwrap();
        std::fs::create_dir(dir.path().join("quiz")).unwrap();
        std::fs::write(
            dir.path().join("quiz").join(CORE_CONFIG_FILE),
            r#"{"activity": {"enabled": true, "container": "quiz"}}"#,
        )
        .unwrap();

        let config = CoreConfig::load(dir.path(), "quiz");
        assert!(config.keep_warm);
        assert!(config.activity.enabled);
        assert_eq!(config.activity.database.as_deref(), Some("pg"));
        assert_eq!(config.activity.container.as_deref(), Some("quiz"));
    }

    #[test]
    fn missing_global_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(CoreConfig::load(dir.path(), "quiz"), CoreConfig::default());
    }
}
