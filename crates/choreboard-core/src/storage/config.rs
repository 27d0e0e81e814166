//! TOML-based application configuration.
//!
//! Stores:
//! - Points credited per frequency
//! - Joystick thresholds and timing
//! - Display width and name scrolling cadence
//! - Sweep and clock resync intervals
//! - HTTP bind address
//!
//! Configuration is stored at `~/.config/choreboard/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::ledger::PointsTable;

/// Joystick thresholds (raw ADC units) and timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Readings below this count as a low deflection.
    #[serde(default = "default_low_threshold")]
    pub low_threshold: u16,
    /// Readings above this count as a high deflection.
    #[serde(default = "default_high_threshold")]
    pub high_threshold: u16,
    /// Inclusive dead-zone bounds. The stick must come back here before
    /// another deflection counts.
    #[serde(default = "default_dead_zone_low")]
    pub dead_zone_low: u16,
    #[serde(default = "default_dead_zone_high")]
    pub dead_zone_high: u16,
    #[serde(default = "default_move_delay_ms")]
    pub move_delay_ms: u64,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,
    /// How long the status panel stays up after the button is released.
    #[serde(default = "default_status_dwell_ms")]
    pub status_dwell_ms: u64,
}

/// Character display geometry and name scrolling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_scroll_step_ms")]
    pub scroll_step_ms: u64,
    #[serde(default = "default_scroll_pause_ms")]
    pub scroll_pause_ms: u64,
}

/// Low-frequency timers run by the control loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimersConfig {
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    #[serde(default = "default_resync_interval_secs")]
    pub resync_interval_secs: u64,
    /// Delay between loop iterations.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// HTTP request surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/choreboard/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub points: PointsTable,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub timers: TimersConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

// Default functions
fn default_low_threshold() -> u16 {
    1000
}
fn default_high_threshold() -> u16 {
    3000
}
fn default_dead_zone_low() -> u16 {
    1500
}
fn default_dead_zone_high() -> u16 {
    2600
}
fn default_move_delay_ms() -> u64 {
    250
}
fn default_debounce_ms() -> u64 {
    50
}
fn default_long_press_ms() -> u64 {
    1000
}
fn default_status_dwell_ms() -> u64 {
    2000
}
fn default_width() -> usize {
    16
}
fn default_scroll_step_ms() -> u64 {
    400
}
fn default_scroll_pause_ms() -> u64 {
    1500
}
fn default_sweep_interval_secs() -> u64 {
    60
}
fn default_resync_interval_secs() -> u64 {
    3600
}
fn default_poll_interval_ms() -> u64 {
    20
}
fn default_bind() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            low_threshold: default_low_threshold(),
            high_threshold: default_high_threshold(),
            dead_zone_low: default_dead_zone_low(),
            dead_zone_high: default_dead_zone_high(),
            move_delay_ms: default_move_delay_ms(),
            debounce_ms: default_debounce_ms(),
            long_press_ms: default_long_press_ms(),
            status_dwell_ms: default_status_dwell_ms(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            scroll_step_ms: default_scroll_step_ms(),
            scroll_pause_ms: default_scroll_pause_ms(),
        }
    }
}

impl Default for TimersConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
            resync_interval_secs: default_resync_interval_secs(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
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
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("not a leaf value".to_string()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("config.toml"),
                message: e.to_string(),
            })
    }

    /// Load from the data directory, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// fails validation, or if the default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
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
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the data directory.
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

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.points
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                key: "points".to_string(),
                message: e.to_string(),
            })?;

        let input = &self.input;
        if !(input.low_threshold < input.dead_zone_low
            && input.dead_zone_low <= input.dead_zone_high
            && input.dead_zone_high < input.high_threshold)
        {
            return Err(ConfigError::InvalidValue {
                key: "input".to_string(),
                message: "expected low_threshold < dead_zone_low <= dead_zone_high < high_threshold"
                    .to_string(),
            });
        }
        if self.display.width == 0 {
            return Err(ConfigError::InvalidValue {
                key: "display.width".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
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

    /// Set a config value by key without saving. The result must still
    /// validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the updated config is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}
