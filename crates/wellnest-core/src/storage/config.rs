//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Breathing pattern durations
//! - A custom stretch routine
//! - Daily water and calorie goals
//! - The tick period used by the live driver
//!
//! Configuration is stored at `~/.config/wellnest/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::data_dir;
use crate::error::ConfigError;
use crate::sequencer::{BreathingPattern, Phase, Sequence};

/// Breathing pattern configuration, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathingConfig {
    #[serde(default = "default_inhale")]
    pub inhale: u64,
    #[serde(default = "default_hold")]
    pub hold: u64,
    #[serde(default = "default_exhale")]
    pub exhale: u64,
    #[serde(default)]
    pub rest: u64,
}

/// Stretch routine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StretchConfig {
    /// Replaces the built-in routine when set.
    #[serde(default)]
    pub routine: Option<Vec<Phase>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterConfig {
    #[serde(default = "default_water_goal")]
    pub daily_goal_ml: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealsConfig {
    #[serde(default = "default_calorie_goal")]
    pub calorie_goal: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/wellnest/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub breathing: BreathingConfig,
    #[serde(default)]
    pub stretch: StretchConfig,
    #[serde(default)]
    pub water: WaterConfig,
    #[serde(default)]
    pub meals: MealsConfig,
    #[serde(default)]
    pub driver: DriverConfig,
}

fn default_inhale() -> u64 {
    4
}
fn default_hold() -> u64 {
    7
}
fn default_exhale() -> u64 {
    8
}
fn default_water_goal() -> u32 {
    2000
}
fn default_calorie_goal() -> u32 {
    2000
}
fn default_tick_ms() -> u64 {
    1000
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            inhale: default_inhale(),
            hold: default_hold(),
            exhale: default_exhale(),
            rest: 0,
        }
    }
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            daily_goal_ml: default_water_goal(),
        }
    }
}

impl Default for MealsConfig {
    fn default() -> Self {
        Self {
            calorie_goal: default_calorie_goal(),
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
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

        let mut parent = root;
        if let Some(path) = parent_path {
            for part in path.split('.') {
                parent = parent.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let obj = parent.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => value
                .parse::<u64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
            serde_json::Value::Object(_)
            | serde_json::Value::Array(_)
            | serde_json::Value::Null => {
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
            serde_json::Value::String(_) => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("config.toml"),
                message: e.to_string(),
            })
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
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
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// as the type the key already holds.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    pub fn breathing_pattern(&self) -> BreathingPattern {
        BreathingPattern {
            inhale: self.breathing.inhale,
            hold: self.breathing.hold,
            exhale: self.breathing.exhale,
            rest: self.breathing.rest,
        }
    }

    /// The configured stretch routine, or the built-in one.
    ///
    /// An invalid custom routine is ignored with a warning.
    pub fn stretch_sequence(&self) -> Sequence {
        if let Some(ref phases) = self.stretch.routine {
            match Sequence::new("stretch", phases.clone(), false) {
                Ok(sequence) => return sequence,
                Err(e) => warn!(error = %e, "ignoring custom stretch routine"),
            }
        }
        Sequence::default_stretches()
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.driver.tick_ms.max(1))
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
        assert_eq!(parsed.breathing.inhale, 4);
        assert_eq!(parsed.water.daily_goal_ml, 2000);
        assert!(parsed.stretch.routine.is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[breathing]\nhold = 4\n").unwrap();
        assert_eq!(parsed.breathing.hold, 4);
        assert_eq!(parsed.breathing.inhale, 4);
        assert_eq!(parsed.meals.calorie_goal, 2000);
        assert_eq!(parsed.driver.tick_ms, 1000);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("breathing.exhale").as_deref(), Some("8"));
        assert_eq!(cfg.get("water.daily_goal_ml").as_deref(), Some("2000"));
        assert!(cfg.get("water.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("meals.calorie_goal", "1800").unwrap();
        assert_eq!(cfg.meals.calorie_goal, 1800);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("water.nonexistent", "1").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        let err = cfg.set("breathing.inhale", "slow").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(cfg.breathing.inhale, 4);
    }

    #[test]
    fn set_accepts_json_for_custom_routine() {
        let mut cfg = Config::default();
        cfg.set(
            "stretch.routine",
            r#"[{"id":"a","label":"Reach","duration_secs":20}]"#,
        )
        .unwrap();
        let seq = cfg.stretch_sequence();
        assert_eq!(seq.phases.len(), 1);
        assert!(!seq.cyclic);
    }

    #[test]
    fn invalid_custom_routine_falls_back() {
        let mut cfg = Config::default();
        cfg.stretch.routine = Some(vec![]);
        assert_eq!(cfg.stretch_sequence(), Sequence::default_stretches());
    }

    #[test]
    fn load_from_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.breathing.exhale, 8);
        assert!(path.exists());

        let mut cfg = cfg;
        cfg.set("driver.tick_ms", "250").unwrap();
        cfg.save_to(&path).unwrap();
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.tick_period(), Duration::from_millis(250));
    }
}
