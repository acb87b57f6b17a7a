//! Check-in sources feeding the scan counter of an open window.
//!
//! A [`ScanSource`] is attached when a window opens and receives an
//! [`ArrivalReporter`] bound to that window. The engine aborts the task the
//! source spawned as soon as the window closes, and the reporter refuses
//! arrivals for any window other than its own.
//!
//! Two sources ship with the crate:
//! - [`SimulatedScans`]: random arrivals on a fixed cadence (demo mode)
//! - [`ChannelScans`]: arrivals pushed through an mpsc channel by a real
//!   check-in front end

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use super::state::{Generation, SessionState};

/// Handle through which a source reports that one more student checked in.
#[derive(Debug, Clone)]
pub struct ArrivalReporter {
    state: Arc<Mutex<SessionState>>,
    generation: Generation,
}

impl ArrivalReporter {
    pub(crate) const fn new(state: Arc<Mutex<SessionState>>, generation: Generation) -> Self {
        Self { state, generation }
    }

    /// Reports one check-in. Returns `true` if the scan count moved.
    ///
    /// Arrivals are dropped once the roster size is reached or the window
    /// this reporter belongs to has closed.
    pub fn report_arrival(&self) -> bool {
        let counted = self.state.lock().record_arrival(self.generation);
        if counted {
            tracing::debug!(generation = self.generation, "check-in counted");
        }
        counted
    }

    /// Whether the window this reporter belongs to is still open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.lock().is_current(self.generation)
    }
}

/// Producer of check-ins for an open window.
pub trait ScanSource: Send + Sync {
    /// Starts delivering arrivals to `reporter`.
    ///
    /// `cadence` is the polling period for sources that sample on a timer.
    /// The returned task is aborted when the window closes.
    fn attach(&self, reporter: ArrivalReporter, cadence: Duration) -> JoinHandle<()>;
}

/// Demo source: on every cadence tick a student checks in with fixed probability.
#[derive(Debug, Clone)]
pub struct SimulatedScans {
    probability: f64,
    seed: Option<u64>,
}

impl SimulatedScans {
    /// Creates a source that fires with `probability` per tick (clamped to `[0, 1]`).
    #[must_use]
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            seed: None,
        }
    }

    /// Uses a fixed RNG seed so every window sees the same arrival pattern.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Chance of an arrival on each tick.
    #[must_use]
    pub const fn probability(&self) -> f64 {
        self.probability
    }
}

impl Default for SimulatedScans {
    fn default() -> Self {
        Self::new(0.4)
    }
}

impl ScanSource for SimulatedScans {
    fn attach(&self, reporter: ArrivalReporter, cadence: Duration) -> JoinHandle<()> {
        let probability = self.probability;
        let mut rng = self
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        tokio::spawn(async move {
            let mut tick = time::interval_at(Instant::now() + cadence, cadence);
            loop {
                tick.tick().await;
                if !reporter.is_open() {
                    break;
                }
                if rng.random_bool(probability) {
                    reporter.report_arrival();
                }
            }
        })
    }
}

/// A single check-in delivered through [`ChannelScans`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckIn;

/// Source backed by an mpsc channel; whatever holds the sender reports arrivals.
///
/// Check-ins sent while no window is open are discarded when the next
/// window attaches.
#[derive(Debug, Clone)]
pub struct ChannelScans {
    rx: Arc<tokio::sync::Mutex<mpsc::Receiver<CheckIn>>>,
}

impl ChannelScans {
    /// Creates the source and the sender that feeds it.
    #[must_use]
    pub fn new(buffer: usize) -> (mpsc::Sender<CheckIn>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (
            tx,
            Self {
                rx: Arc::new(tokio::sync::Mutex::new(rx)),
            },
        )
    }
}

impl ScanSource for ChannelScans {
    fn attach(&self, reporter: ArrivalReporter, _cadence: Duration) -> JoinHandle<()> {
        let rx = Arc::clone(&self.rx);
        tokio::spawn(async move {
            let mut rx = rx.lock().await;
            while rx.try_recv().is_ok() {}
            while rx.recv().await.is_some() {
                if !reporter.is_open() {
                    break;
                }
                reporter.report_arrival();
            }
        })
    }
}
