//! Pure attendance-session state machine.
//!
//! No timers live here. Every window opened by [`SessionState::start`] gets
//! a fresh generation number; timer-driven callers pass it back so that a
//! late tick or arrival from an earlier window cannot touch the current one.

use classroom_proto::session::{SessionSnapshot, SessionStatus};

/// Identifies one opened check-in window.
pub type Generation = u64;

/// Result of delivering one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session was not active (or the tick was stale); nothing changed.
    Idle,
    /// Countdown continues with this many seconds left.
    Counting(u32),
    /// This tick closed the window.
    Expired,
}

/// State of the attendance session.
#[derive(Debug, Clone)]
pub struct SessionState {
    status: SessionStatus,
    remaining_secs: u32,
    scan_count: u32,
    roster_size: u32,
    window_secs: u32,
    generation: Generation,
}

impl SessionState {
    /// Creates an inactive session whose windows last `window_secs`.
    #[must_use]
    pub const fn new(window_secs: u32) -> Self {
        Self {
            status: SessionStatus::Inactive,
            remaining_secs: 0,
            scan_count: 0,
            roster_size: 0,
            window_secs,
            generation: 0,
        }
    }

    /// Opens a fresh window, discarding any previous one.
    ///
    /// Valid from every state; starting while active restarts the window.
    pub fn start(&mut self, roster_size: u32) -> Generation {
        self.generation = self.generation.wrapping_add(1);
        self.status = SessionStatus::Active;
        self.remaining_secs = self.window_secs;
        self.scan_count = 0;
        self.roster_size = roster_size;
        self.generation
    }

    /// Advances the countdown of the current window by one unit.
    pub fn tick(&mut self) -> TickOutcome {
        self.tick_for(self.generation)
    }

    /// Advances the countdown if `generation` still names the open window.
    pub fn tick_for(&mut self, generation: Generation) -> TickOutcome {
        if !self.is_current(generation) {
            return TickOutcome::Idle;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.status = SessionStatus::Expired;
            TickOutcome::Expired
        } else {
            TickOutcome::Counting(self.remaining_secs)
        }
    }

    /// Counts one check-in, clamped to the roster size.
    ///
    /// Returns `true` if the count moved.
    pub fn record_arrival(&mut self, generation: Generation) -> bool {
        if !self.is_current(generation) || self.scan_count >= self.roster_size {
            return false;
        }
        self.scan_count += 1;
        true
    }

    /// Closes the window immediately and returns the session to `Inactive`.
    ///
    /// Returns `true` if a window was open.
    pub fn stop(&mut self) -> bool {
        let was_active = self.status == SessionStatus::Active;
        self.status = SessionStatus::Inactive;
        self.remaining_secs = 0;
        was_active
    }

    /// Whether `generation` names the window that is currently open.
    #[must_use]
    pub fn is_current(&self, generation: Generation) -> bool {
        self.status == SessionStatus::Active && self.generation == generation
    }

    /// Generation of the most recently opened window.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Seconds left in the window.
    #[must_use]
    pub const fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Check-ins counted in the current or last window.
    #[must_use]
    pub const fn scan_count(&self) -> u32 {
        self.scan_count
    }

    /// Copies the observable fields.
    #[must_use]
    pub const fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            remaining_secs: self.remaining_secs,
            scan_count: self.scan_count,
            roster_size: self.roster_size,
        }
    }
}
