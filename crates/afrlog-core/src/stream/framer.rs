//! Push-based record framer
//!
//! Accumulates byte chunks and hands back every complete record they finish.

use bytes::{Buf, BytesMut};

use super::DELIMITER;

/// Split the next complete record off the front of `buf`.
///
/// `search_from` remembers how far the buffer has already been scanned so a
/// long unterminated record is not rescanned on every chunk. It is reset once
/// a record is taken.
pub(crate) fn split_record(buf: &mut BytesMut, search_from: &mut usize) -> Option<String> {
    let start = (*search_from).min(buf.len());

    match buf[start..]
        .windows(DELIMITER.len())
        .position(|window| window == DELIMITER)
    {
        Some(offset) => {
            let record = buf.split_to(start + offset);
            buf.advance(DELIMITER.len());
            *search_from = 0;
            Some(String::from_utf8_lossy(&record).into_owned())
        }
        None => {
            // A trailing '\r' may be the first half of a delimiter
            *search_from = buf.len().saturating_sub(DELIMITER.len() - 1);
            None
        }
    }
}

/// Record framer for one connection
///
/// Feed it chunks with [`push`](Self::push) and close it with
/// [`finish`](Self::finish). A framer is not reusable across connections;
/// build a new one for each.
#[derive(Debug, Default)]
pub struct RecordFramer {
    /// Bytes received but not yet part of a complete record
    buffer: BytesMut,
    /// Scan position inside `buffer`
    search_from: usize,
}

impl RecordFramer {
    /// Create an empty framer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every record it completes, in order
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut records = Vec::new();
        while let Some(record) = split_record(&mut self.buffer, &mut self.search_from) {
            records.push(record);
        }
        records
    }

    /// Number of buffered bytes waiting for a delimiter
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Close the framer at end of stream.
    ///
    /// Bytes without a trailing delimiter are dropped, never emitted. Returns
    /// how many were dropped.
    pub fn finish(self) -> usize {
        let dropped = self.buffer.len();
        if dropped > 0 {
            tracing::debug!(dropped, "discarding unterminated trailing record");
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_chunk_many_records() {
        let mut framer = RecordFramer::new();
        let records = framer.push(b"14.7\r\n14.9\r\n15.0");
        assert_eq!(records, vec!["14.7", "14.9"]);
        assert_eq!(framer.pending(), 4);
    }

    #[test]
    fn test_delimiter_split_across_chunks() {
        let mut framer = RecordFramer::new();
        assert!(framer.push(b"13.2\r").is_empty());
        assert_eq!(framer.push(b"\n"), vec!["13.2"]);
        assert_eq!(framer.pending(), 0);
    }

    #[test]
    fn test_lone_newline_is_not_a_delimiter() {
        let mut framer = RecordFramer::new();
        assert!(framer.push(b"12.0\n12.5\r").is_empty());
        assert_eq!(framer.push(b"\n"), vec!["12.0\n12.5"]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut framer = RecordFramer::new();
        let records = framer.push(b"1\xff4\r\n");
        assert_eq!(records, vec!["1\u{fffd}4"]);
    }

    #[test]
    fn test_finish_reports_dropped_tail() {
        let mut framer = RecordFramer::new();
        framer.push(b"14.7\r\n15");
        assert_eq!(framer.finish(), 2);
    }
}
