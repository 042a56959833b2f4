//! Shared recorder with its sampling clock
//!
//! Wraps a [`Recorder`] behind a mutex together with the tokio task that
//! ticks it. All commands go through the lock, so the recorder behaves the
//! same on a multi-threaded runtime as on a single thread.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::{Recorder, RecorderConfig, RecorderError, RecordingState};
use crate::stream::SampleSink;

/// Recorder state plus the clock driving it
#[derive(Debug)]
struct Inner {
    recorder: Recorder,
    /// Armed clock task, present exactly while running
    clock: Option<JoinHandle<()>>,
    /// Bumped every time a clock is armed; a clock only ticks for its own epoch
    epoch: u64,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(task) = self.clock.take() {
            task.abort();
        }
    }
}

/// Cloneable handle to the process recorder
#[derive(Debug, Clone)]
pub struct SharedRecorder {
    inner: Arc<Mutex<Inner>>,
}

impl Default for SharedRecorder {
    fn default() -> Self {
        Self::new(RecorderConfig::default())
    }
}

impl SharedRecorder {
    /// Create an idle recorder
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                recorder: Recorder::new(config),
                clock: None,
                epoch: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every command leaves the state consistent, so a poisoned lock is still usable
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store the latest sample
    pub fn update_latest(&self, value: f64) {
        self.lock().recorder.update_latest(value);
    }

    /// Most recent sample
    pub fn latest_value(&self) -> f64 {
        self.lock().recorder.latest_value()
    }

    /// Check if recording is active
    pub fn is_running(&self) -> bool {
        self.lock().recorder.is_running()
    }

    /// Number of series
    pub fn series_count(&self) -> usize {
        self.lock().recorder.series().len()
    }

    /// Copy of the observable state
    pub fn snapshot(&self) -> RecordingState {
        self.lock().recorder.snapshot()
    }

    /// Start recording into a new series and arm the sampling clock.
    ///
    /// Must be called from within a tokio runtime. Starting while already
    /// running returns [`RecorderError::AlreadyRunning`] and never arms a
    /// second clock.
    pub fn start(&self) -> Result<(), RecorderError> {
        let runtime = Handle::try_current().map_err(|_| RecorderError::NoRuntime)?;

        let mut inner = self.lock();
        inner.recorder.start()?;

        inner.epoch += 1;
        let epoch = inner.epoch;
        let period = inner.recorder.config().resolution;
        let task = runtime.spawn(run_clock(Arc::downgrade(&self.inner), epoch, period));
        inner.clock = Some(task);

        tracing::debug!(epoch, period_ms = period.as_millis() as u64, "sampling clock armed");
        Ok(())
    }

    /// Stop recording.
    ///
    /// When this returns no further tick can append to any series. Stopping
    /// an idle recorder does nothing.
    pub fn stop(&self) {
        let mut inner = self.lock();
        if let Some(task) = inner.clock.take() {
            task.abort();
            tracing::debug!(epoch = inner.epoch, "sampling clock disarmed");
        }
        inner.recorder.stop();
    }

    /// Begin a new series, returning its index
    pub fn split(&self) -> usize {
        self.lock().recorder.split()
    }

    /// Reset to a single empty series. Running state and clock are kept.
    pub fn clear(&self) {
        self.lock().recorder.clear();
    }

    /// Rename the series at `index`
    pub fn rename(&self, index: usize, name: impl Into<String>) -> Result<(), RecorderError> {
        self.lock().recorder.rename(index, name)
    }
}

impl SampleSink for SharedRecorder {
    fn update_latest(&mut self, value: f64) {
        SharedRecorder::update_latest(self, value);
    }
}

/// Sampling clock task.
///
/// The first tick fires one period after arming. Late ticks are skipped
/// rather than bunched up, so missed samples are never backfilled.
async fn run_clock(inner: Weak<Mutex<Inner>>, epoch: u64, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        if !tick_epoch(&inner, epoch) {
            break;
        }
    }
}

/// Apply one tick if the clock for `epoch` is still the armed one.
///
/// Returns `false` once the clock is stale and should exit.
fn tick_epoch(inner: &Weak<Mutex<Inner>>, epoch: u64) -> bool {
    let Some(shared) = inner.upgrade() else {
        return false;
    };
    let mut guard = shared.lock().unwrap_or_else(PoisonError::into_inner);
    if guard.epoch != epoch || !guard.recorder.is_running() {
        return false;
    }
    guard.recorder.tick();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_without_runtime() {
        let recorder = SharedRecorder::default();
        assert_eq!(recorder.start(), Err(RecorderError::NoRuntime));
        assert!(!recorder.is_running());
        assert_eq!(recorder.series_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_ticks_at_resolution() {
        let recorder = SharedRecorder::default();
        recorder.update_latest(13.5);
        recorder.start().unwrap();

        // Nothing before the first period elapses
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(recorder.snapshot().series[0].is_empty());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(recorder.snapshot().series[0].data, vec![13.5, 13.5]);

        recorder.stop();
    }
}
