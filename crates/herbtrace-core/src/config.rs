//! Configuration resolution for `HerbTrace`.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/herbtrace/settings.json)
//! 3. Project config (.herbtrace/settings.json)
//! 4. Environment variables
//! 5. CLI arguments (highest priority, applied by the binary)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Complete `HerbTrace` configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Object store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Hosted object store URL. `None` selects the in-memory store.
    #[serde(default)]
    pub base_url: Option<String>,
    /// API key sent as a bearer token.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Page size for listings. Only the first page is ever read.
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_list_limit() -> u32 {
    100
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            list_limit: default_list_limit(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
    /// Log file used by the terminal UI.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            file: None,
        }
    }
}

impl Config {
    /// Reject settings that would leave the store unusable.
    pub fn validate(&self) -> Result<()> {
        if self.store.list_limit == 0 {
            return Err(Error::Config("store.list_limit must be at least 1".into()));
        }
        Ok(())
    }
}

/// One settings file. Every key is optional so an overlay only touches
/// what it names.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    store: StoreFile,
    #[serde(default)]
    logging: LoggingFile,
}

#[derive(Debug, Default, Deserialize)]
struct StoreFile {
    base_url: Option<String>,
    api_key: Option<String>,
    list_limit: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingFile {
    level: Option<String>,
    json: Option<bool>,
    file: Option<PathBuf>,
}

/// Load configuration with hierarchical resolution.
pub fn load_config(project_dir: Option<&Path>) -> Result<Config> {
    let global = global_config_path();
    resolve(global.as_deref(), project_dir, |key| std::env::var(key).ok())
}

fn resolve(
    global_path: Option<&Path>,
    project_dir: Option<&Path>,
    var: impl Fn(&str) -> Option<String>,
) -> Result<Config> {
    let mut config = Config::default();

    if let Some(path) = global_path {
        if path.exists() {
            merge_config(&mut config, load_config_file(path)?);
        }
    }

    if let Some(dir) = project_dir {
        let project_path = dir.join(".herbtrace").join("settings.json");
        if project_path.exists() {
            merge_config(&mut config, load_config_file(&project_path)?);
        }
    }

    apply_env_overrides(&mut config, var);
    config.validate()?;
    Ok(config)
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    data_dir().map(|d| d.join("settings.json"))
}

/// Per-user directory holding settings and the TUI log file.
pub fn data_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("herbtrace"))
}

pub(crate) fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

fn merge_config(base: &mut Config, overlay: ConfigFile) {
    let ConfigFile { store, logging } = overlay;
    if let Some(url) = store.base_url {
        base.store.base_url = Some(url);
    }
    if let Some(key) = store.api_key {
        base.store.api_key = Some(key);
    }
    if let Some(limit) = store.list_limit {
        base.store.list_limit = limit;
    }
    if let Some(secs) = store.timeout_secs {
        base.store.timeout_secs = secs;
    }

    if let Some(level) = logging.level {
        base.logging.level = level;
    }
    if let Some(json) = logging.json {
        base.logging.json = json;
    }
    if let Some(file) = logging.file {
        base.logging.file = Some(file);
    }
}

fn apply_env_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("HERBTRACE_STORE_URL") {
        config.store.base_url = Some(val);
    }
    if let Some(val) = var("HERBTRACE_API_KEY") {
        config.store.api_key = Some(val);
    }
    if let Some(val) = var("HERBTRACE_LIST_LIMIT") {
        if let Ok(n) = val.parse() {
            config.store.list_limit = n;
        }
    }
    if let Some(val) = var("HERBTRACE_LOG_LEVEL") {
        config.logging.level = val;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_project(dir: &Path, json: &str) {
        let project = dir.join(".herbtrace");
        std::fs::create_dir_all(&project).unwrap();
        std::fs::write(project.join("settings.json"), json).unwrap();
    }

    #[test]
    fn default_config_uses_memory_store() {
        let config = Config::default();
        assert!(config.store.base_url.is_none());
        assert_eq!(config.store.list_limit, 100);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"store": {"base_url": "https://store.test"}}"#).unwrap();

        let config = resolve(Some(&path), None, no_env).unwrap();
        assert_eq!(config.store.base_url.as_deref(), Some("https://store.test"));
        assert_eq!(config.store.list_limit, 100);
        assert_eq!(config.logging.level, "info");

        std::fs::write(&path, r#"{"logging": {"json": true}}"#).unwrap();
        let config = resolve(Some(&path), None, no_env).unwrap();
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn project_file_overrides_url() {
        let dir = tempfile::tempdir().unwrap();
        write_project(
            dir.path(),
            r#"{"store": {"base_url": "https://project.test", "list_limit": 25}}"#,
        );

        let config = resolve(None, Some(dir.path()), no_env).unwrap();
        assert_eq!(config.store.base_url.as_deref(), Some("https://project.test"));
        assert_eq!(config.store.list_limit, 25);
    }

    #[test]
    fn project_file_keeps_global_values_it_does_not_name() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("settings.json");
        std::fs::write(
            &global,
            r#"{"store": {"list_limit": 50, "timeout_secs": 5},
                "logging": {"level": "debug", "json": true}}"#,
        )
        .unwrap();
        write_project(dir.path(), r#"{"store": {"base_url": "https://p.test"}}"#);

        let config = resolve(Some(&global), Some(dir.path()), no_env).unwrap();
        assert_eq!(config.store.base_url.as_deref(), Some("https://p.test"));
        assert_eq!(config.store.list_limit, 50);
        assert_eq!(config.store.timeout_secs, 5);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn zero_list_limit_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), r#"{"store": {"list_limit": 0}}"#);
        let err = resolve(None, Some(dir.path()), no_env).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("list_limit")));

        let err = resolve(None, None, |key| {
            (key == "HERBTRACE_LIST_LIMIT").then(|| "0".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn env_overrides_win() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, |key| match key {
            "HERBTRACE_STORE_URL" => Some("https://env.test".into()),
            "HERBTRACE_LIST_LIMIT" => Some("not-a-number".into()),
            "HERBTRACE_LOG_LEVEL" => Some("debug".into()),
            _ => None,
        });
        assert_eq!(config.store.base_url.as_deref(), Some("https://env.test"));
        assert_eq!(config.store.list_limit, 100);
        assert_eq!(config.logging.level, "debug");
    }
}
