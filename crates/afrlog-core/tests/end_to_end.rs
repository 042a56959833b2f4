use afrlog_core::demo::{DemoSensor, DemoSource, DEMO_INTERVAL};
use afrlog_core::recorder::SharedRecorder;
use afrlog_core::stream::{pump, PumpStats, SampleSink};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Sink that records every update while forwarding to a recorder
struct Observed {
    recorder: SharedRecorder,
    seen: Vec<f64>,
}

impl SampleSink for Observed {
    fn update_latest(&mut self, value: f64) {
        self.seen.push(value);
        self.recorder.update_latest(value);
    }
}

#[tokio::test(start_paused = true)]
async fn test_bytes_to_recorded_series() {
    let recorder = SharedRecorder::default();
    let mut sink = Observed {
        recorder: recorder.clone(),
        seen: Vec::new(),
    };

    let source: &[u8] = b"14.7\r\n14.9\r\n";
    let stats = pump(source, &mut sink).await.unwrap();

    assert_eq!(sink.seen, vec![14.7, 14.9]);
    assert_eq!(stats.samples, 2);
    assert_eq!(recorder.latest_value(), 14.9);

    recorder.start().unwrap();
    tokio::time::sleep(Duration::from_millis(3 * 200 + 50)).await;
    recorder.stop();

    let state = recorder.snapshot();
    assert_eq!(state.series.len(), 1);
    assert_eq!(state.series[0].data, vec![14.9, 14.9, 14.9]);
}

#[tokio::test]
async fn test_malformed_records_leave_no_trace() {
    let recorder = SharedRecorder::default();
    let before = recorder.snapshot();

    let source: &[u8] = b"abc\r\n\r\nNaN\r\nInfinity\r\n--\r\n";
    let stats = pump(source, &mut recorder.clone()).await.unwrap();

    assert_eq!(
        stats,
        PumpStats {
            records: 5,
            samples: 0,
            discarded: 5,
        }
    );
    assert_eq!(recorder.snapshot(), before);
}

#[tokio::test]
async fn test_leading_numeric_records_are_samples() {
    let mut seen = Vec::new();
    let source: &[u8] = b"14.7\r\n14.7xyz\r\n 13.9 AFR\r\n";
    pump(source, &mut seen).await.unwrap();
    assert_eq!(seen, vec![14.7, 14.7, 13.9]);
}

#[tokio::test(start_paused = true)]
async fn test_samples_follow_arrival_order_while_recording() {
    let recorder = SharedRecorder::default();
    recorder.start().unwrap();

    let (reader, mut writer) = tokio::io::duplex(64);
    let mut sink = recorder.clone();
    let pump_task = tokio::spawn(async move { pump(reader, &mut sink).await });

    // One reading per clock period, each arriving mid-period and split in two
    for (head, tail) in [("13.", "0\r\n"), ("13.5\r", "\n"), ("1", "4.0\r\n")] {
        tokio::time::sleep(Duration::from_millis(40)).await;
        writer.write_all(head.as_bytes()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        writer.write_all(tail.as_bytes()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    drop(writer);

    let stats = pump_task.await.unwrap().unwrap();
    recorder.stop();

    assert_eq!(stats.samples, 3);
    assert_eq!(recorder.snapshot().series[0].data, vec![13.0, 13.5, 14.0]);
}

#[tokio::test(start_paused = true)]
async fn test_demo_source_feeds_recorder() {
    let recorder = SharedRecorder::default();
    let source = DemoSource::spawn(DemoSensor::with_seed(5), DEMO_INTERVAL);

    let mut sink = recorder.clone();
    let pump_task = tokio::spawn(async move { pump(source, &mut sink).await });

    recorder.start().unwrap();
    tokio::time::sleep(Duration::from_millis(1_050)).await;
    recorder.stop();
    pump_task.abort();

    let state = recorder.snapshot();
    assert_eq!(state.series[0].len(), 5);
    assert!(state.series[0].data.iter().all(|afr| (10.0..=20.0).contains(afr)));
}
