//! Byte source to sample feed

use futures::StreamExt;
use serde::Serialize;
use tokio::io::AsyncRead;

use super::{parse_sample, records, StreamError};

/// Anything that consumes decoded samples
pub trait SampleSink {
    /// Accept the most recent sample
    fn update_latest(&mut self, value: f64);
}

impl SampleSink for Vec<f64> {
    fn update_latest(&mut self, value: f64) {
        self.push(value);
    }
}

/// Counters for one pumped connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PumpStats {
    /// Complete records framed
    pub records: u64,
    /// Records that produced a sample
    pub samples: u64,
    /// Records dropped because they had no finite numeric value
    pub discarded: u64,
}

/// Drive a byte source to end of stream, feeding every sample to `sink`.
///
/// Samples reach the sink in the order their bytes arrived. Unparseable
/// records are skipped silently. The only error is an I/O failure of the
/// source itself.
pub async fn pump<R, S>(source: R, sink: &mut S) -> Result<PumpStats, StreamError>
where
    R: AsyncRead + Unpin,
    S: SampleSink + ?Sized,
{
    let mut stream = records(source);
    let mut stats = PumpStats::default();

    while let Some(record) = stream.next().await {
        let record = record?;
        stats.records += 1;

        match parse_sample(&record) {
            Some(value) => {
                sink.update_latest(value);
                stats.samples += 1;
            }
            None => stats.discarded += 1,
        }
    }

    tracing::debug!(?stats, "byte source ended");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pump_counts() {
        let source: &[u8] = b"14.7\r\nabc\r\n\r\n15.2xyz\r\n16";
        let mut seen = Vec::new();

        let stats = pump(source, &mut seen).await.unwrap();

        assert_eq!(seen, vec![14.7, 15.2]);
        assert_eq!(
            stats,
            PumpStats {
                records: 4,
                samples: 2,
                discarded: 2,
            }
        );
    }
}
