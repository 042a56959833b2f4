//! # AFR Logger Core Library
//!
//! Core functionality for logging a wideband air-fuel ratio sensor.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - Framing of the sensor's `\r\n` delimited text output
//! - Conversion of records into numeric samples
//! - A recorder that samples the latest reading on a fixed clock into named
//!   series, with start / stop / split / clear
//! - A simulated sensor for demo mode
//!
//! The physical link is not handled here: anything implementing
//! `tokio::io::AsyncRead` can be the byte source.
//!
//! ## Example
//!
//! ```rust,ignore
//! use afrlog_core::{recorder::SharedRecorder, stream::pump};
//!
//! let recorder = SharedRecorder::default();
//! recorder.start()?;
//!
//! // Feed the recorder until the sensor goes away
//! let stats = pump(port, &mut recorder.clone()).await?;
//! println!("{} samples", stats.samples);
//!
//! recorder.stop();
//! let takes = recorder.snapshot().series;
//! ```

use std::time::Duration;

pub mod config;
pub mod demo;
pub mod recorder;
pub mod stream;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{ConfigError, LoggerConfig};
    pub use crate::demo::{DemoSensor, DemoSource};
    pub use crate::recorder::{
        Recorder, RecorderConfig, RecorderError, RecordingState, Series, SharedRecorder,
    };
    pub use crate::stream::{
        parse_sample, pump, records, PumpStats, RecordCodec, RecordFramer, SampleSink,
        StreamError,
    };
}

/// Sampling resolution in milliseconds
pub const RESOLUTION_MS: u64 = 200;

/// Sampling resolution: the recorder's tick period, also a hint for anything
/// animating the recorded data
pub const RESOLUTION: Duration = Duration::from_millis(RESOLUTION_MS);

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
