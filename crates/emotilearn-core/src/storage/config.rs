//! TOML-based application configuration.
//!
//! Stores tunables for the session controller:
//! - Emotion sampling cadence and history size
//! - Automatic transition delays
//! - Default meditation length
//! - Seed for the simulated emotion source
//!
//! Configuration is stored at `~/.config/emotilearn/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::history::HISTORY_CAPACITY;
use crate::meditation::{ALLOWED_DURATIONS, DEFAULT_DURATION_SECS};

/// Upper bound for `session.history_capacity`.
const MAX_HISTORY_CAPACITY: usize = 1000;

/// Upper bound for any transition delay: one hour.
const MAX_DELAY_MS: u64 = 3_600_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

/// Delays before automatic mode changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionConfig {
    #[serde(default = "default_meditation_delay_ms")]
    pub meditation_delay_ms: u64,
    #[serde(default = "default_quiz_delay_ms")]
    pub quiz_delay_ms: u64,
    #[serde(default = "default_quiz_return_delay_ms")]
    pub quiz_return_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeditationConfig {
    #[serde(default = "default_meditation_duration")]
    pub default_duration_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Fixed seed for the weighted random source; random when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/emotilearn/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub transitions: TransitionConfig,
    #[serde(default)]
    pub meditation: MeditationConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

fn default_sample_interval_ms() -> u64 {
    3000
}
fn default_history_capacity() -> usize {
    HISTORY_CAPACITY
}
fn default_meditation_delay_ms() -> u64 {
    2000
}
fn default_quiz_delay_ms() -> u64 {
    1500
}
fn default_quiz_return_delay_ms() -> u64 {
    2000
}
fn default_meditation_duration() -> u64 {
    DEFAULT_DURATION_SECS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: default_sample_interval_ms(),
            history_capacity: default_history_capacity(),
        }
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            meditation_delay_ms: default_meditation_delay_ms(),
            quiz_delay_ms: default_quiz_delay_ms(),
            quiz_return_delay_ms: default_quiz_return_delay_ms(),
        }
    }
}

impl Default for MeditationConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: default_meditation_duration(),
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
        key.split('.').try_fold(root, |current, part| current.get(part))
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

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent_path) = parent_path {
            for part in parent_path.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
            ),
            serde_json::Value::Number(_) => serde_json::Value::Number(
                value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                    .into(),
            ),
            // Optional numbers serialize as null when unset.
            serde_json::Value::Null => match value {
                "" | "none" => serde_json::Value::Null,
                _ => serde_json::Value::Number(
                    value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                        .into(),
                ),
            },
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                return Err(invalid("cannot set a whole section".into()));
            }
            serde_json::Value::String(_) => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Reject values the controller cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        };
        if self.session.sample_interval_ms == 0 {
            return Err(invalid("session.sample_interval_ms", "must be positive"));
        }
        if !(1..=MAX_HISTORY_CAPACITY).contains(&self.session.history_capacity) {
            return Err(invalid("session.history_capacity", "must be between 1 and 1000"));
        }
        for (key, delay) in [
            ("transitions.meditation_delay_ms", self.transitions.meditation_delay_ms),
            ("transitions.quiz_delay_ms", self.transitions.quiz_delay_ms),
            ("transitions.quiz_return_delay_ms", self.transitions.quiz_return_delay_ms),
        ] {
            if delay > MAX_DELAY_MS {
                return Err(invalid(key, "must be at most 3600000 (one hour)"));
            }
        }
        if !ALLOWED_DURATIONS.contains(&self.meditation.default_duration_secs) {
            return Err(invalid(
                "meditation.default_duration_secs",
                "must be one of 120, 300, 600",
            ));
        }
        Ok(())
    }

    /// Load from `path`, or write and return defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or fails
    /// validation, or if the default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value in memory by dot-separated key, then validate.
    /// The change is discarded if the result is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.into(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.into(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.session.sample_interval_ms, 3000);
        assert_eq!(parsed.transitions.meditation_delay_ms, 2000);
        assert_eq!(parsed.source.seed, None);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let parsed: Config = toml::from_str("[transitions]\nquiz_delay_ms = 900\n").unwrap();
        assert_eq!(parsed.transitions.quiz_delay_ms, 900);
        assert_eq!(parsed.transitions.meditation_delay_ms, 2000);
        assert_eq!(parsed.session.history_capacity, 20);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("session.sample_interval_ms").as_deref(), Some("3000"));
        assert_eq!(cfg.get("source.seed").as_deref(), Some("null"));
        assert!(cfg.get("session.missing").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_numbers_and_optional_seed() {
        let mut cfg = Config::default();
        cfg.set("transitions.quiz_delay_ms", "2500").unwrap();
        assert_eq!(cfg.transitions.quiz_delay_ms, 2500);
        cfg.set("source.seed", "42").unwrap();
        assert_eq!(cfg.source.seed, Some(42));
    }

    #[test]
    fn set_rejects_out_of_range_capacity_and_delays() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("session.history_capacity", "5000"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("transitions.meditation_delay_ms", &u64::MAX.to_string()),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg.session.history_capacity, 20);
        assert_eq!(cfg.transitions.meditation_delay_ms, 2000);

        cfg.set("session.history_capacity", "1000").unwrap();
        cfg.set("transitions.quiz_return_delay_ms", "3600000").unwrap();
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_values() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("session.nope", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(cfg.set("session.sample_interval_ms", "soon").is_err());
        assert!(cfg.set("session", "1").is_err());
        assert!(cfg.set("meditation.default_duration_secs", "90").is_err());
        assert_eq!(cfg.meditation.default_duration_secs, 300);
    }

    #[test]
    fn load_from_creates_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.meditation.default_duration_secs, 300);

        let mut changed = cfg.clone();
        changed.set("meditation.default_duration_secs", "600").unwrap();
        changed.save_to(&path).unwrap();
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.meditation.default_duration_secs, 600);
    }

    #[test]
    fn load_from_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session]\nsample_interval_ms = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());

        std::fs::write(&path, "not toml ===").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
