//! Sensor Byte Stream
//!
//! Turns the raw byte stream coming off a wideband controller into text
//! records and numeric samples.
//!
//! The controller prints one ASCII reading per line, terminated by `\r\n`.
//! Chunk boundaries on the link have nothing to do with record boundaries, so
//! bytes are accumulated until a full delimiter is seen.

mod codec;
mod error;
mod framer;
mod pump;
mod sample;

pub use codec::{records, RecordCodec, RecordStream};
pub use error::StreamError;
pub use framer::RecordFramer;
pub use pump::{pump, PumpStats, SampleSink};
pub use sample::parse_sample;

/// Record delimiter (carriage return, line feed)
pub const DELIMITER: &[u8] = b"\r\n";
