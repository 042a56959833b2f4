//! Logger configuration
//!
//! Stored as JSON. Missing fields fall back to their defaults, so a config
//! file only needs the values it changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::recorder::{RecorderConfig, DEFAULT_SERIES_PREFIX};
use crate::RESOLUTION_MS;

/// Default baud rate of wideband controllers with a serial text output
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Errors loading or saving a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Sampling resolution must be greater than zero")]
    InvalidResolution,
}

/// Logger settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Serial port name (e.g., "/dev/ttyUSB0" or "COM3"), empty if unset
    pub port_name: String,
    /// Serial baud rate
    pub baud_rate: u32,
    /// Sampling clock period in milliseconds
    pub resolution_ms: u64,
    /// Prefix for default series names
    pub series_prefix: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            resolution_ms: RESOLUTION_MS,
            series_prefix: DEFAULT_SERIES_PREFIX.to_string(),
        }
    }
}

impl LoggerConfig {
    /// Default config file location (`<config dir>/afrlog/config.json`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("afrlog").join("config.json"))
    }

    /// Load a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty-printed JSON, creating parent directories as needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Check values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution_ms == 0 {
            return Err(ConfigError::InvalidResolution);
        }
        Ok(())
    }

    /// Recorder settings derived from this config
    pub fn recorder_config(&self) -> Result<RecorderConfig, ConfigError> {
        self.validate()?;
        Ok(RecorderConfig {
            resolution: Duration::from_millis(self.resolution_ms),
            series_prefix: self.series_prefix.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LoggerConfig = serde_json::from_str(r#"{"port_name": "/dev/ttyUSB0"}"#).unwrap();
        assert_eq!(config.port_name, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, DEFAULT_BAUD_RATE);
        assert_eq!(config.resolution_ms, RESOLUTION_MS);
        assert_eq!(config.series_prefix, "AFR");
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let config = LoggerConfig {
            resolution_ms: 0,
            ..LoggerConfig::default()
        };
        assert!(matches!(
            config.recorder_config(),
            Err(ConfigError::InvalidResolution)
        ));
    }

    #[test]
    fn test_recorder_config() {
        let config = LoggerConfig {
            resolution_ms: 50,
            series_prefix: "Lambda".to_string(),
            ..LoggerConfig::default()
        };
        let recorder = config.recorder_config().unwrap();
        assert_eq!(recorder.resolution, Duration::from_millis(50));
        assert_eq!(recorder.series_name(2), "Lambda #2");
    }
}
