//! Pull-based record stream
//!
//! [`RecordCodec`] plugs the framer into `tokio_util::codec`, so any
//! `AsyncRead` byte source becomes a lazy stream of records.

use bytes::BytesMut;
use tokio::io::AsyncRead;
use tokio_util::codec::{Decoder, FramedRead};

use super::framer::split_record;
use super::StreamError;

/// Lazy stream of text records read from a byte source
pub type RecordStream<R> = FramedRead<R, RecordCodec>;

/// Wrap a byte source in a fresh record stream
pub fn records<R: AsyncRead>(source: R) -> RecordStream<R> {
    FramedRead::new(source, RecordCodec::new())
}

/// `\r\n` record decoder
#[derive(Debug, Default, Clone)]
pub struct RecordCodec {
    search_from: usize,
}

impl RecordCodec {
    /// Create a new decoder
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for RecordCodec {
    type Item = String;
    type Error = StreamError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, StreamError> {
        Ok(split_record(src, &mut self.search_from))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, StreamError> {
        if let Some(record) = self.decode(src)? {
            return Ok(Some(record));
        }

        if !src.is_empty() {
            tracing::debug!(dropped = src.len(), "discarding unterminated trailing record");
            src.clear();
        }
        self.search_from = 0;
        Ok(None)
    }
}
