use crate::error::{Result, RmdifyError};
use crate::export::ExportFormat;
use crate::store::local::DEFAULT_NAMESPACE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 3000;
// Matches the usual per-origin browser local-storage allowance
const DEFAULT_STORAGE_QUOTA: u64 = 5 * 1024 * 1024;

/// Configuration for rmdify, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RmdifyConfig {
    /// Prefix for every storage key (`<namespace>-docs-list`, ...)
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Idle time after the last edit before the draft is autosaved
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,

    /// Format used by `export` when none is given
    #[serde(default)]
    pub default_export_format: ExportFormat,

    /// Total bytes the store may hold; `null` disables the limit
    #[serde(default = "default_storage_quota")]
    pub storage_quota_bytes: Option<u64>,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_autosave_delay_ms() -> u64 {
    DEFAULT_AUTOSAVE_DELAY_MS
}

fn default_storage_quota() -> Option<u64> {
    Some(DEFAULT_STORAGE_QUOTA)
}

impl Default for RmdifyConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            default_export_format: ExportFormat::default(),
            storage_quota_bytes: default_storage_quota(),
        }
    }
}

/// Keys accepted by `rmdify config <key> [value]`.
pub const CONFIG_KEYS: &[&str] = &[
    "namespace",
    "autosave-delay-ms",
    "default-export-format",
    "storage-quota-bytes",
];

impl RmdifyConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(RmdifyError::Io)?;
        let config: RmdifyConfig =
            serde_json::from_str(&content).map_err(RmdifyError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(RmdifyError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(RmdifyError::Serialization)?;
        fs::write(config_path, content).map_err(RmdifyError::Io)?;
        Ok(())
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    /// Current value of a key, rendered for display.
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "namespace" => Ok(self.namespace.clone()),
            "autosave-delay-ms" => Ok(self.autosave_delay_ms.to_string()),
            "default-export-format" => Ok(self.default_export_format.to_string()),
            "storage-quota-bytes" => Ok(self
                .storage_quota_bytes
                .map(|q| q.to_string())
                .unwrap_or_else(|| "none".to_string())),
            other => Err(RmdifyError::Api(format!("Unknown config key: {}", other))),
        }
    }

    /// Parse and assign a value for a key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "namespace" => {
                let value = value.trim();
                if value.is_empty() || value.contains(char::is_whitespace) {
                    return Err(RmdifyError::Api(format!("Invalid namespace: '{}'", value)));
                }
                self.namespace = value.to_string();
            }
            "autosave-delay-ms" => {
                self.autosave_delay_ms = parse_number(key, value)?;
            }
            "default-export-format" => {
                self.default_export_format = value.parse()?;
            }
            "storage-quota-bytes" => {
                self.storage_quota_bytes = match value {
                    "none" | "off" => None,
                    _ => Some(parse_number(key, value)?),
                };
            }
            other => {
                return Err(RmdifyError::Api(format!("Unknown config key: {}", other)));
            }
        }
        Ok(())
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| RmdifyError::Api(format!("{} expects a number, got '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = RmdifyConfig::default();
        assert_eq!(config.namespace, "rmdify");
        assert_eq!(config.autosave_delay(), Duration::from_secs(3));
        assert_eq!(config.default_export_format, ExportFormat::Markdown);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempdir().unwrap();
        let config = RmdifyConfig::load(dir.path()).unwrap();
        assert_eq!(config, RmdifyConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let mut config = RmdifyConfig::default();
        config.set("default-export-format", "pdf").unwrap();
        config.set("autosave-delay-ms", "500").unwrap();
        config.save(dir.path().join("nested")).unwrap();

        let loaded = RmdifyConfig::load(dir.path().join("nested")).unwrap();
        assert_eq!(loaded.default_export_format, ExportFormat::Pdf);
        assert_eq!(loaded.autosave_delay_ms, 500);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"namespace":"notes"}"#).unwrap();

        let config = RmdifyConfig::load(dir.path()).unwrap();
        assert_eq!(config.namespace, "notes");
        assert_eq!(config.autosave_delay_ms, 3000);
        assert_eq!(config.storage_quota_bytes, Some(5 * 1024 * 1024));
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = RmdifyConfig::default();
        assert!(config.set("autosave-delay-ms", "soon").is_err());
        assert!(config.set("default-export-format", "docx").is_err());
        assert!(config.set("namespace", "has space").is_err());
        assert!(config.set("color", "blue").is_err());
    }

    #[test]
    fn test_quota_can_be_disabled() {
        let mut config = RmdifyConfig::default();
        config.set("storage-quota-bytes", "none").unwrap();
        assert_eq!(config.storage_quota_bytes, None);
        assert_eq!(config.get("storage-quota-bytes").unwrap(), "none");
    }
}
