//! QR attendance session engine.
//!
//! [`AttendanceSession`] drives a timed check-in window. Opening a window
//! spawns two tasks: a countdown that ticks once per time unit (unless the
//! caller ticks by hand, see [`Countdown`]), and the configured
//! [`ScanSource`] sampling every `scan_every_ticks` units. Both
//! are held in a [`SessionTimers`] handle that is dropped (and therefore
//! aborted) whenever the window leaves `Active`.
//!
//! All state lives behind one mutex, so timer tasks and commands never
//! interleave inside a transition. The timer slot uses a second mutex; the
//! two locks are never held together except in [`AttendanceSession::start`],
//! which takes the timer slot first.

pub mod scan;
pub mod state;
pub mod timers;

use std::sync::Arc;
use std::time::Duration;

use classroom_proto::session::{SessionSnapshot, SessionStatus};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

pub use scan::{ArrivalReporter, ChannelScans, CheckIn, ScanSource, SimulatedScans};
pub use state::{Generation, SessionState, TickOutcome};
pub use timers::SessionTimers;

/// Default check-in window length, in time units.
pub const DEFAULT_WINDOW_SECS: u32 = 300;

/// Shortest time unit the timers will run at.
pub const MIN_TIME_UNIT: Duration = Duration::from_millis(1);

/// Who advances the countdown of an open window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Countdown {
    /// A spawned task ticks once per time unit.
    #[default]
    Timer,
    /// The caller delivers every tick through [`AttendanceSession::tick`].
    Manual,
}

/// Timing parameters of the check-in window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Window length in time units.
    pub window_secs: u32,
    /// Wall-clock length of one time unit.
    pub time_unit: Duration,
    /// Scan sampling period, in time units.
    pub scan_every_ticks: u32,
    /// Source of countdown ticks.
    pub countdown: Countdown,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            window_secs: DEFAULT_WINDOW_SECS,
            time_unit: Duration::from_secs(1),
            scan_every_ticks: 2,
            countdown: Countdown::Timer,
        }
    }
}

impl SessionConfig {
    /// Wall-clock length of one tick, never below [`MIN_TIME_UNIT`].
    #[must_use]
    pub fn tick_period(&self) -> Duration {
        self.time_unit.max(MIN_TIME_UNIT)
    }

    /// Wall-clock period between scan samples.
    #[must_use]
    pub fn scan_cadence(&self) -> Duration {
        self.tick_period() * self.scan_every_ticks.max(1)
    }
}

/// State shared between the engine and its timer tasks.
#[derive(Debug)]
struct Shared {
    state: Arc<Mutex<SessionState>>,
    timers: Mutex<Option<SessionTimers>>,
}

impl Shared {
    /// Drops the timers of `generation`, if they are still installed.
    fn cancel_timers(&self, generation: Generation) {
        let taken = {
            let mut slot = self.timers.lock();
            if slot.as_ref().is_some_and(|t| t.generation() == generation) {
                slot.take()
            } else {
                None
            }
        };
        drop(taken);
    }

    /// Drops whatever timers are installed.
    fn cancel_all(&self) {
        let taken = self.timers.lock().take();
        drop(taken);
    }
}

/// Timed QR check-in window with a pluggable arrival source.
///
/// Requires a tokio runtime for [`start`](Self::start); every other method
/// is synchronous. Dropping the engine cancels any running timers.
pub struct AttendanceSession<S: ScanSource> {
    shared: Arc<Shared>,
    source: S,
    config: SessionConfig,
}

impl<S: ScanSource> AttendanceSession<S> {
    /// Creates an inactive session.
    pub fn new(config: SessionConfig, source: S) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Arc::new(Mutex::new(SessionState::new(config.window_secs))),
                timers: Mutex::new(None),
            }),
            source,
            config,
        }
    }

    /// Opens a fresh window sized for `roster_size` students.
    ///
    /// Any open window is discarded first: its timers are cancelled and the
    /// countdown and scan count restart from scratch.
    pub fn start(&self, roster_size: usize) -> SessionSnapshot {
        let roster_size = u32::try_from(roster_size).unwrap_or(u32::MAX);
        let mut slot = self.shared.timers.lock();
        drop(slot.take());

        let (generation, snapshot) = {
            let mut state = self.shared.state.lock();
            let generation = state.start(roster_size);
            (generation, state.snapshot())
        };

        let reporter = ArrivalReporter::new(Arc::clone(&self.shared.state), generation);
        let scans = self.source.attach(reporter, self.config.scan_cadence());
        let countdown = match self.config.countdown {
            Countdown::Timer => Some(spawn_countdown(
                Arc::clone(&self.shared),
                generation,
                self.config.tick_period(),
            )),
            Countdown::Manual => None,
        };
        *slot = Some(SessionTimers::new(generation, countdown, scans));
        drop(slot);

        tracing::info!(
            generation,
            window_secs = self.config.window_secs,
            roster_size,
            "check-in window opened"
        );
        snapshot
    }

    /// Delivers one countdown tick by hand.
    ///
    /// Only sessions configured with [`Countdown::Manual`] accept ticks;
    /// with [`Countdown::Timer`] the spawned countdown owns the window and
    /// this returns [`TickOutcome::Idle`]. Also a no-op unless a window is
    /// open. Expiry cancels the scan timer.
    pub fn tick(&self) -> TickOutcome {
        if self.config.countdown == Countdown::Timer {
            tracing::trace!("manual tick ignored, countdown is timer-driven");
            return TickOutcome::Idle;
        }
        let (outcome, generation) = {
            let mut state = self.shared.state.lock();
            (state.tick(), state.generation())
        };
        if outcome == TickOutcome::Expired {
            tracing::info!(generation, "check-in window expired");
            self.shared.cancel_timers(generation);
        }
        outcome
    }

    /// Closes any window immediately and returns to `Inactive`.
    ///
    /// Returns `true` if a window was open.
    pub fn stop(&self) -> bool {
        let was_active = self.shared.state.lock().stop();
        self.shared.cancel_all();
        if was_active {
            tracing::info!("check-in window stopped");
        }
        was_active
    }

    /// Counts one check-in against the open window.
    ///
    /// Returns `true` if the scan count moved.
    pub fn report_arrival(&self) -> bool {
        let generation = self.shared.state.lock().generation();
        ArrivalReporter::new(Arc::clone(&self.shared.state), generation).report_arrival()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.shared.state.lock().status()
    }

    /// Seconds left in the window.
    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.shared.state.lock().remaining_secs()
    }

    /// Check-ins counted in the current or last window.
    #[must_use]
    pub fn scan_count(&self) -> u32 {
        self.shared.state.lock().scan_count()
    }

    /// Copies the observable state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.state.lock().snapshot()
    }

    /// Whether timer tasks are currently installed.
    #[must_use]
    pub fn timers_running(&self) -> bool {
        self.shared.timers.lock().is_some()
    }

    /// Timing parameters in use.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl<S: ScanSource> Drop for AttendanceSession<S> {
    fn drop(&mut self) {
        self.shared.cancel_all();
    }
}

/// Spawns the once-per-unit countdown for `generation`.
fn spawn_countdown(shared: Arc<Shared>, generation: Generation, unit: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = time::interval_at(Instant::now() + unit, unit);
        loop {
            tick.tick().await;
            let outcome = shared.state.lock().tick_for(generation);
            match outcome {
                TickOutcome::Counting(_) => {}
                TickOutcome::Expired => {
                    tracing::info!(generation, "check-in window expired");
                    shared.cancel_timers(generation);
                    break;
                }
                TickOutcome::Idle => break,
            }
        }
    })
}
