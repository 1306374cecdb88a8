//! Application configuration management.
//!
//! Configuration is stored at `~/.config/studentdir/config.json` and covers
//! where records live, the simulated service latency, and the default list
//! ordering. `STUDENTDIR_DATA_DIR` and `STUDENTDIR_NO_LATENCY` override the
//! file when set.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::LatencyProfile;
use crate::models::SortColumn;

/// Application name used for config/data directory paths
const APP_NAME: &str = "studentdir";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const ENV_DATA_DIR: &str = "STUDENTDIR_DATA_DIR";
const ENV_NO_LATENCY: &str = "STUDENTDIR_NO_LATENCY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub list_latency_ms: Option<u64>,
    pub lookup_latency_ms: Option<u64>,
    pub index_latency_ms: Option<u64>,
    #[serde(default)]
    pub no_latency: bool,
    #[serde(default)]
    pub default_sort: SortColumn,
}

impl Config {
    /// Load the config file (defaults if absent), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(flag) = lookup(ENV_NO_LATENCY) {
            let flag = flag.trim().to_ascii_lowercase();
            self.no_latency = matches!(flag.as_str(), "1" | "true" | "yes");
        }
    }

    /// Directory holding `students.json`, the session file and logs.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("logs"))
    }

    pub fn latency_profile(&self) -> LatencyProfile {
        if self.no_latency {
            return LatencyProfile::none();
        }
        let defaults = LatencyProfile::default();
        LatencyProfile {
            standard: self
                .list_latency_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.standard),
            lookup: self
                .lookup_latency_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.lookup),
            index: self
                .index_latency_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_latency_matches_service() {
        assert_eq!(Config::default().latency_profile(), LatencyProfile::default());
    }

    #[test]
    fn test_latency_overrides() {
        let config = Config {
            list_latency_ms: Some(10),
            index_latency_ms: Some(0),
            ..Default::default()
        };
        let profile = config.latency_profile();
        assert_eq!(profile.standard, Duration::from_millis(10));
        assert_eq!(profile.lookup, LatencyProfile::default().lookup);
        assert_eq!(profile.index, Duration::ZERO);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config {
            list_latency_ms: Some(10),
            ..Default::default()
        };
        config.apply_overrides(env(&[
            (ENV_DATA_DIR, "/tmp/students"),
            (ENV_NO_LATENCY, "true"),
        ]));
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/students"));
        assert_eq!(config.latency_profile(), LatencyProfile::none());
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = Config {
            data_dir: Some(PathBuf::from("/srv/dir")),
            ..Default::default()
        };
        config.apply_overrides(env(&[(ENV_DATA_DIR, ""), (ENV_NO_LATENCY, "0")]));
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/dir")));
        assert!(!config.no_latency);
    }

    #[test]
    fn test_partial_config_file_parses() {
        let config: Config = serde_json::from_str(r#"{"default_sort":"year"}"#).unwrap();
        assert_eq!(config.default_sort, SortColumn::Year);
        assert!(config.data_dir.is_none());
        assert!(!config.no_latency);
    }
}
