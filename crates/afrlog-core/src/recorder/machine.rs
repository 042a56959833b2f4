//! Recorder state machine
//!
//! Pure, clock-less recording state. Every sampling tick is an explicit
//! [`Recorder::tick`] call; [`SharedRecorder`](super::SharedRecorder) owns the
//! timer that makes those calls.

use super::{RecorderConfig, RecorderError, RecordingState, Series, STOICHIOMETRIC_AFR};
use crate::stream::SampleSink;

/// Recording state
#[derive(Debug, Clone)]
pub struct Recorder {
    /// Clock period and naming
    config: RecorderConfig,
    /// Whether ticks append to the active series
    running: bool,
    /// Most recent sample
    latest: f64,
    /// Recorded series, last one active
    series: Vec<Series>,
}

impl Recorder {
    /// Create an idle recorder with no series
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            config,
            running: false,
            latest: STOICHIOMETRIC_AFR,
            series: Vec::new(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Store the latest sample. Never touches the series.
    pub fn update_latest(&mut self, value: f64) {
        self.latest = value;
    }

    /// Most recent sample
    pub fn latest_value(&self) -> f64 {
        self.latest
    }

    /// Check if recording is active
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// All series in creation order
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// The series ticks append to
    pub fn active_series(&self) -> Option<&Series> {
        self.series.last()
    }

    /// Append a new series padded to the length of the current active one
    fn push_series(&mut self) -> usize {
        let len = self.series.last().map(Series::len).unwrap_or(0);
        let name = self.config.series_name(self.series.len() + 1);
        self.series.push(Series::padded(name, len));
        self.series.len() - 1
    }

    /// Start recording into a new series.
    ///
    /// Fails with [`RecorderError::AlreadyRunning`] without changing anything
    /// if recording is already active.
    pub fn start(&mut self) -> Result<(), RecorderError> {
        if self.running {
            tracing::warn!("start ignored, recording already running");
            return Err(RecorderError::AlreadyRunning);
        }

        let index = self.push_series();
        self.running = true;
        tracing::info!(series = %self.series[index].name, "recording started");
        Ok(())
    }

    /// Stop recording. Returns whether recording was running.
    pub fn stop(&mut self) -> bool {
        let was_running = std::mem::replace(&mut self.running, false);
        if was_running {
            tracing::info!("recording stopped");
        }
        was_running
    }

    /// Begin a new series without touching the running state.
    ///
    /// Returns the index of the new series. The previous one stops growing.
    pub fn split(&mut self) -> usize {
        let index = self.push_series();
        tracing::info!(series = %self.series[index].name, running = self.running, "series split");
        index
    }

    /// Drop every series and start over with one empty default series.
    ///
    /// Running state is kept: if recording, sampling continues into the new
    /// series. This is destructive, so front ends should confirm with the
    /// user before calling it.
    pub fn clear(&mut self) {
        self.series.clear();
        self.series.push(Series::new(self.config.series_name(1)));
        tracing::info!(running = self.running, "series cleared");
    }

    /// Rename the series at `index`
    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> Result<(), RecorderError> {
        let len = self.series.len();
        match self.series.get_mut(index) {
            Some(series) => {
                series.name = name.into();
                Ok(())
            }
            None => {
                tracing::warn!(index, len, "rename of missing series");
                Err(RecorderError::SeriesOutOfRange { index, len })
            }
        }
    }

    /// One sampling tick: append the latest sample to the active series.
    ///
    /// Returns whether a sample was appended.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        match self.series.last_mut() {
            Some(active) => {
                active.data.push(self.latest);
                true
            }
            None => false,
        }
    }

    /// Copy of the observable state
    pub fn snapshot(&self) -> RecordingState {
        RecordingState {
            running: self.running,
            latest_value: self.latest,
            series: self.series.clone(),
        }
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new(RecorderConfig::default())
    }
}

impl SampleSink for Recorder {
    fn update_latest(&mut self, value: f64) {
        Recorder::update_latest(self, value);
    }
}
