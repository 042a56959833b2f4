//! Demo Mode - Simulated wideband sensor
//!
//! Generates realistic AFR readings for testing without an instrument.
//! Simulates an engine idling near stoichiometric with random throttle blips:
//! rich while the throttle opens and holds, lean on lift-off.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::io::{AsyncRead, AsyncWriteExt, DuplexStream, ReadBuf};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::recorder::STOICHIOMETRIC_AFR;

/// Interval between simulated readings
pub const DEMO_INTERVAL: Duration = Duration::from_millis(10);

const RAMP_UP_MS: u64 = 300;
const HOLD_MS: u64 = 400;
const RAMP_DOWN_MS: u64 = 800;

/// AFR under full load
const WOT_AFR: f64 = 12.8;
/// AFR right after the throttle closes
const OVERRUN_AFR: f64 = 17.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum BlipState {
    /// Engine idling normally
    Idle,
    /// Throttle opening, mixture going rich
    RampUp { start_ms: u64 },
    /// Throttle held open
    Hold { start_ms: u64 },
    /// Throttle closed, lean spike settling back to idle
    RampDown { start_ms: u64 },
}

/// Simulated AFR sensor
#[derive(Debug)]
pub struct DemoSensor {
    /// Time of the first update (ms)
    start_time_ms: Option<u64>,
    /// Time of next throttle blip (ms from start)
    next_blip_at_ms: u64,
    /// Current blip state
    blip_state: BlipState,
    /// Random number generator
    rng: StdRng,
}

impl Default for DemoSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoSensor {
    /// Create a sensor with a random seed
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a sensor with a fixed seed, for reproducible runs
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut rng: StdRng) -> Self {
        let first_blip = rng.gen_range(3000..8000);
        Self {
            start_time_ms: None,
            next_blip_at_ms: first_blip,
            blip_state: BlipState::Idle,
            rng,
        }
    }

    /// Current reading
    ///
    /// # Arguments
    /// * `elapsed_ms` - Milliseconds since some fixed origin; the first call
    ///   becomes the start of the simulation
    pub fn update(&mut self, elapsed_ms: u64) -> f64 {
        let start = *self.start_time_ms.get_or_insert(elapsed_ms);
        let sim_time = elapsed_ms.saturating_sub(start);

        self.update_blip_state(sim_time);

        let t = sim_time as f64 / 1000.0;
        let base = match self.blip_state {
            BlipState::Idle => STOICHIOMETRIC_AFR + 0.3 * (t * 1.5).sin() + 0.1 * (t * 4.7).sin(),
            BlipState::RampUp { start_ms } => {
                let progress = ((sim_time - start_ms) as f64 / RAMP_UP_MS as f64).min(1.0);
                STOICHIOMETRIC_AFR + (WOT_AFR - STOICHIOMETRIC_AFR) * progress
            }
            BlipState::Hold { .. } => WOT_AFR + 0.2 * (t * 3.0).sin(),
            BlipState::RampDown { start_ms } => {
                let progress = ((sim_time - start_ms) as f64 / RAMP_DOWN_MS as f64).min(1.0);
                // Lean spike that decays back to stoich
                OVERRUN_AFR + (STOICHIOMETRIC_AFR - OVERRUN_AFR) * progress
            }
        };

        let noise = self.rng.gen_range(-0.05..0.05);
        (base + noise).clamp(10.0, 20.0)
    }

    /// Current reading formatted the way the controller prints it
    pub fn record(&mut self, elapsed_ms: u64) -> String {
        format!("{:.2}\r\n", self.update(elapsed_ms))
    }

    /// Update the blip state machine
    fn update_blip_state(&mut self, sim_time: u64) {
        match self.blip_state {
            BlipState::Idle => {
                if sim_time >= self.next_blip_at_ms {
                    self.blip_state = BlipState::RampUp { start_ms: sim_time };
                }
            }
            BlipState::RampUp { start_ms } => {
                if sim_time >= start_ms + RAMP_UP_MS {
                    self.blip_state = BlipState::Hold { start_ms: sim_time };
                }
            }
            BlipState::Hold { start_ms } => {
                if sim_time >= start_ms + HOLD_MS {
                    self.blip_state = BlipState::RampDown { start_ms: sim_time };
                }
            }
            BlipState::RampDown { start_ms } => {
                if sim_time >= start_ms + RAMP_DOWN_MS {
                    self.blip_state = BlipState::Idle;
                    let next_interval = self.rng.gen_range(8000..15000);
                    self.next_blip_at_ms = sim_time + next_interval;
                }
            }
        }
    }

    /// Where to cut a record of `len` bytes into two writes (`len` means no cut)
    fn chunk_cut(&mut self, len: usize) -> usize {
        if len > 1 && self.rng.gen_bool(0.2) {
            self.rng.gen_range(1..len)
        } else {
            len
        }
    }
}

/// Async byte source backed by a [`DemoSensor`]
///
/// Writes one record per interval, sometimes split across two chunks the way
/// a real serial link delivers them. The generator stops when the source is
/// dropped.
#[derive(Debug)]
pub struct DemoSource {
    reader: DuplexStream,
    task: JoinHandle<()>,
}

impl DemoSource {
    /// Start generating readings. Must be called from within a tokio runtime.
    pub fn spawn(mut sensor: DemoSensor, interval: Duration) -> Self {
        let (reader, mut writer) = tokio::io::duplex(1024);

        let task = tokio::spawn(async move {
            let start = Instant::now();
            let mut ticker = tokio::time::interval(interval);

            loop {
                ticker.tick().await;
                let elapsed_ms = start.elapsed().as_millis() as u64;
                let record = sensor.record(elapsed_ms);
                let (head, tail) = record.as_bytes().split_at(sensor.chunk_cut(record.len()));

                if writer.write_all(head).await.is_err() || writer.write_all(tail).await.is_err() {
                    break;
                }
            }
            tracing::debug!("demo source stopped");
        });

        Self { reader, task }
    }
}

impl AsyncRead for DemoSource {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.reader).poll_read(cx, buf)
    }
}

impl Drop for DemoSource {
    fn drop(&mut self) {
        self.task.abort();
    }
}
