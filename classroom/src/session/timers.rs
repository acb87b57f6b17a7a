//! Timer tasks tied to one open check-in window.

use tokio::task::JoinHandle;

use super::state::Generation;

/// Owns the countdown and scan tasks of one window.
///
/// The countdown is absent when the caller ticks by hand. Dropping the handle aborts both tasks, so every path that takes it out
/// of the engine (expiry, stop, restart, engine drop) cancels the timers.
#[derive(Debug)]
pub struct SessionTimers {
    generation: Generation,
    countdown: Option<JoinHandle<()>>,
    scans: JoinHandle<()>,
}

impl SessionTimers {
    pub(crate) const fn new(
        generation: Generation,
        countdown: Option<JoinHandle<()>>,
        scans: JoinHandle<()>,
    ) -> Self {
        Self {
            generation,
            countdown,
            scans,
        }
    }

    /// Window these timers belong to.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }
}

impl Drop for SessionTimers {
    fn drop(&mut self) {
        if let Some(countdown) = &self.countdown {
            countdown.abort();
        }
        self.scans.abort();
        tracing::trace!(generation = self.generation, "session timers cancelled");
    }
}
