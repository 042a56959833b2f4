//! Recorder errors

use thiserror::Error;

/// Commands the recorder refuses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecorderError {
    #[error("Recording already running")]
    AlreadyRunning,

    #[error("Series index {index} out of range ({len} series)")]
    SeriesOutOfRange { index: usize, len: usize },

    #[error("No async runtime available to drive the sampling clock")]
    NoRuntime,
}
