//! TOML-based application configuration.
//!
//! Stores:
//! - Calendar engine tuning (fetch timeout, stats windows, window policy)
//! - Deep-link base URL for synthesized events
//! - Log filter for the CLI
//! - Database location override
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::calendar::{CalendarConfig, Links};
use crate::error::ConfigError;

/// Deep-link configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Absolute dashboard URL, e.g. `https://app.example.com/`.
    /// Empty or absent means app-relative links.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `CREATORDESK_LOG`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

/// Storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file; defaults to `<data_dir>/creatordesk.db`.
    #[serde(default)]
    pub database_path: Option<String>,
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_log_filter() -> String {
    "warn".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as integer")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    serde_json::Value::Null if value.is_empty() => serde_json::Value::Null,
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from the default location, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default config");
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        let cfg: Self = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
        cfg.calendar.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => Some(String::new()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key.
    ///
    /// The whole config is re-validated, so an unknown window policy or an
    /// out-of-range day count is rejected here rather than on the next load.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value has the wrong shape.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.calendar.validate()?;
        *self = updated;
        Ok(())
    }

    /// Deep-link builder for the configured base URL.
    pub fn links(&self) -> Links {
        Links::from_config(self.links.base_url.as_deref())
    }

    /// Resolved database path.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match self.storage.database_path.as_deref().filter(|p| !p.is_empty()) {
            Some(p) => Ok(PathBuf::from(p)),
            None => Ok(data_dir()?.join("creatordesk.db")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::WindowPolicy;

    #[test]
    fn default_config_roundtrips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::default();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[calendar]\nfetch_timeout_ms = 250\n").unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.calendar.fetch_timeout_ms, 250);
        assert_eq!(cfg.calendar.stats_window_days, 30);
        assert_eq!(cfg.logging.filter, "warn");
    }

    #[test]
    fn get_and_set_by_dotted_key() {
        let mut cfg = Config::default();
        assert_eq!(cfg.get("calendar.due_soon_days").as_deref(), Some("7"));

        cfg.set("calendar.due_soon_days", "14").unwrap();
        assert_eq!(cfg.calendar.due_soon_days, 14);

        cfg.set("calendar.include_payments", "false").unwrap();
        assert!(!cfg.calendar.include_payments);

        cfg.set("calendar.window_policy", "event_start").unwrap();
        assert_eq!(cfg.calendar.window_policy, WindowPolicy::EventStart);

        cfg.set("links.base_url", "https://app.example.com/").unwrap();
        assert_eq!(
            cfg.links.base_url.as_deref(),
            Some("https://app.example.com/")
        );
    }

    #[test]
    fn set_rejects_bad_keys_and_values() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("calendar.nope", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("calendar.fetch_timeout_ms", "soon"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("calendar.window_policy", "whenever"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_rejects_out_of_range_day_counts() {
        let mut cfg = Config::default();
        for value in ["200000000", "0", "-5"] {
            assert!(matches!(
                cfg.set("calendar.stats_window_days", value),
                Err(ConfigError::InvalidValue { .. })
            ));
            assert!(matches!(
                cfg.set("calendar.due_soon_days", value),
                Err(ConfigError::InvalidValue { .. })
            ));
        }
        assert!(cfg.set("calendar.fetch_timeout_ms", "0").is_err());
        assert_eq!(cfg, Config::default());

        cfg.set("calendar.stats_window_days", "3650").unwrap();
        assert_eq!(cfg.calendar.stats_window_days, 3650);
    }

    #[test]
    fn load_rejects_out_of_range_day_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[calendar]\nstats_window_days = -30\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
