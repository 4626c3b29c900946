//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Mode durations and the long-break interval
//! - The dark-mode flag
//! - The goal text a new focus session starts with
//!
//! Configuration is stored at `~/.config/zenfocus/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::config_path;
use crate::error::{ConfigError, Result};
use crate::timer::{ModeDurations, TimerSettings, DEFAULT_GOAL};

/// Longest mode duration accepted, in minutes. Keeps the clock at `MM:SS`.
const MAX_DURATION_MIN: u32 = 99;

/// Schedule-specific configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_focus_duration")]
    pub focus_duration: u32,
    #[serde(default = "default_short_break")]
    pub short_break: u32,
    #[serde(default = "default_long_break")]
    pub long_break: u32,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
}

/// UI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub dark_mode: bool,
}

/// Focus view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusConfig {
    #[serde(default = "default_goal")]
    pub default_goal: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/zenfocus/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub focus: FocusConfig,
}

// Default functions
fn default_focus_duration() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    3
}
fn default_goal() -> String {
    DEFAULT_GOAL.into()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            focus_duration: default_focus_duration(),
            short_break: default_short_break(),
            long_break: default_long_break(),
            sessions_before_long_break: default_sessions_before_long_break(),
        }
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            default_goal: default_goal(),
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
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parents, leaf) = match key.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parents) = parents {
            for part in parents.split('.') {
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
            serde_json::Value::Number(_) => {
                let n = value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                serde_json::Value::Number(n.into())
            }
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                return Err(invalid("cannot overwrite a whole section".into()));
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if it holds
    /// out-of-range values, or if the default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self> {
        let cfg = Self::read_from(path)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Like [`load_from`](Self::load_from) but skips [`validate`](Self::validate).
    ///
    /// Used by callers that only touch one section and must keep working
    /// when another section holds out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// default config cannot be written.
    pub fn read_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)
                    .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "config not found, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
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

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails validation. The config is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check value ranges the timer depends on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad key.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let durations = [
            ("schedule.focus_duration", self.schedule.focus_duration),
            ("schedule.short_break", self.schedule.short_break),
            ("schedule.long_break", self.schedule.long_break),
        ];
        for (key, minutes) in durations {
            if minutes == 0 || minutes > MAX_DURATION_MIN {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: format!("must be between 1 and {MAX_DURATION_MIN} minutes"),
                });
            }
        }
        if self.schedule.sessions_before_long_break == 0 {
            return Err(ConfigError::InvalidValue {
                key: "schedule.sessions_before_long_break".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Timer durations and escalation policy from the schedule section.
    pub fn timer_settings(&self) -> TimerSettings {
        TimerSettings {
            durations: ModeDurations::from_minutes(
                u64::from(self.schedule.focus_duration),
                u64::from(self.schedule.short_break),
                u64::from(self.schedule.long_break),
            ),
            long_break_every: self.schedule.sessions_before_long_break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerMode;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert!(!parsed.ui.dark_mode);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.schedule.focus_duration, 25);
        assert_eq!(cfg.schedule.short_break, 5);
        assert_eq!(cfg.schedule.long_break, 15);
        assert_eq!(cfg.schedule.sessions_before_long_break, 3);
        assert_eq!(cfg.focus.default_goal, "Complete project proposal");
        assert!(!cfg.ui.dark_mode);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[ui]\ndark_mode = true\n").unwrap();
        assert!(cfg.ui.dark_mode);
        assert_eq!(cfg.schedule.focus_duration, 25);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("ui.dark_mode").as_deref(), Some("false"));
        assert_eq!(cfg.get("schedule.focus_duration").as_deref(), Some("25"));
        assert_eq!(
            cfg.get("focus.default_goal").as_deref(),
            Some("Complete project proposal")
        );
        assert!(cfg.get("ui.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("ui.dark_mode", "true").unwrap();
        cfg.set("schedule.long_break", "20").unwrap();
        cfg.set("focus.default_goal", "Deep work").unwrap();
        assert!(cfg.ui.dark_mode);
        assert_eq!(cfg.schedule.long_break, 20);
        assert_eq!(cfg.focus.default_goal, "Deep work");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("ui.nonexistent_key", "value").unwrap_err();
        assert!(matches!(err, crate::CoreError::Config(ConfigError::UnknownKey(_))));
        assert!(cfg.set("nope.dark_mode", "true").is_err());
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("ui.dark_mode", "not_a_bool").is_err());
        assert!(cfg.set("schedule.focus_duration", "ten").is_err());
        assert!(cfg.set("schedule", "{}").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_rejects_out_of_range() {
        let mut cfg = Config::default();
        assert!(cfg.set("schedule.focus_duration", "0").is_err());
        assert!(cfg.set("schedule.short_break", "100").is_err());
        assert!(cfg.set("schedule.sessions_before_long_break", "0").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn timer_settings_from_schedule() {
        let mut cfg = Config::default();
        cfg.set("schedule.focus_duration", "50").unwrap();
        cfg.set("schedule.sessions_before_long_break", "4").unwrap();
        let settings = cfg.timer_settings();
        assert_eq!(settings.duration(TimerMode::Focus), 3000);
        assert_eq!(settings.duration(TimerMode::ShortBreak), 300);
        assert_eq!(settings.long_break_every, 4);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("ui.dark_mode", "true").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn load_rejects_garbage_and_bad_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "this is = = not toml").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, crate::CoreError::Config(ConfigError::ParseFailed(_))));

        std::fs::write(&path, "[schedule]\nfocus_duration = 0\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            crate::CoreError::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn load_reports_unreadable_path_as_load_failure() {
        let dir = TempDir::new().unwrap();
        // A directory exists at the path, so reading it fails with something
        // other than NotFound.
        let err = Config::load_from(dir.path()).unwrap_err();
        assert!(matches!(err, crate::CoreError::Config(ConfigError::LoadFailed { .. })));
    }

    #[test]
    fn read_from_skips_range_checks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[schedule]\nfocus_duration = 0\n[ui]\ndark_mode = true\n").unwrap();

        let cfg = Config::read_from(&path).unwrap();
        assert_eq!(cfg.schedule.focus_duration, 0);
        assert!(cfg.ui.dark_mode);
        assert!(Config::load_from(&path).is_err());
    }
}
