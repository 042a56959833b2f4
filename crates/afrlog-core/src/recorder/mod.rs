//! Take Recording
//!
//! Samples the latest sensor reading on a fixed clock and records it into
//! named series ("takes"). Recording is controlled with start / stop / split /
//! clear.

mod clock;
mod error;
mod machine;

pub use clock::SharedRecorder;
pub use error::RecorderError;
pub use machine::Recorder;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::RESOLUTION;

/// Reading reported before the sensor has sent anything (stoichiometric petrol AFR)
pub const STOICHIOMETRIC_AFR: f64 = 14.7;

/// Default series name prefix
pub const DEFAULT_SERIES_PREFIX: &str = "AFR";

/// One named recording segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Display name, defaults to `"AFR #<n>"`
    pub name: String,
    /// Samples in the order they were taken
    pub data: Vec<f64>,
}

impl Series {
    /// Create an empty series
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Vec::new(),
        }
    }

    /// Create a series pre-filled with `len` zero placeholders.
    ///
    /// The zeros only line the new series up with the one before it on a
    /// shared x-axis; they are not measurements.
    pub fn padded(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            data: vec![0.0; len],
        }
    }

    /// Number of points, padding included
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Read model of the recorder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingState {
    /// Whether the sampling clock is appending
    pub running: bool,
    /// Most recent sample, recorded or not
    pub latest_value: f64,
    /// All series, the last one being the append target
    pub series: Vec<Series>,
}

/// Recorder settings
#[derive(Debug, Clone, PartialEq)]
pub struct RecorderConfig {
    /// Sampling clock period
    pub resolution: Duration,
    /// Prefix for default series names
    pub series_prefix: String,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            resolution: RESOLUTION,
            series_prefix: DEFAULT_SERIES_PREFIX.to_string(),
        }
    }
}

impl RecorderConfig {
    /// Default name for the series at 1-based position `ordinal`
    pub fn series_name(&self, ordinal: usize) -> String {
        format!("{} #{}", self.series_prefix, ordinal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_series_is_zero_filled() {
        let series = Series::padded("AFR #2", 3);
        assert_eq!(series.data, vec![0.0, 0.0, 0.0]);
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_series_name() {
        let config = RecorderConfig::default();
        assert_eq!(config.series_name(1), "AFR #1");

        let config = RecorderConfig {
            series_prefix: "Lambda".to_string(),
            ..RecorderConfig::default()
        };
        assert_eq!(config.series_name(4), "Lambda #4");
    }

    #[test]
    fn test_state_json_field_names() {
        let state = RecordingState {
            running: true,
            latest_value: 14.7,
            series: vec![Series::new("AFR #1")],
        };
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["latestValue"], 14.7);
        assert_eq!(json["running"], true);
        assert_eq!(json["series"][0]["name"], "AFR #1");
    }
}
