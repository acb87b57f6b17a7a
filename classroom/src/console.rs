//! Command and query surface of the classroom engine.
//!
//! [`Console`] owns the roster, the attendance session, the task board and
//! the persistence collaborator for one class section. A presentation layer
//! holds a `Console`, issues commands through it and renders its queries.

use std::time::{SystemTime, UNIX_EPOCH};

use classroom_proto::attendance::AttendanceRecord;
use classroom_proto::session::SessionSnapshot;
use classroom_proto::student::{Student, StudentId};
use classroom_proto::task::{Task, TaskId};

use crate::config::ConsoleConfig;
use crate::leaderboard::{self, LeaderboardEntry};
use crate::persistence::{AttendanceStore, PersistenceError};
use crate::roster::{RosterError, RosterStore};
use crate::session::{AttendanceSession, ScanSource, TickOutcome};
use crate::tasks::{TaskBoard, TaskError, TaskForm};

/// Errors surfaced by console commands.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// A roster command failed.
    #[error(transparent)]
    Roster(#[from] RosterError),
    /// A task command failed.
    #[error(transparent)]
    Task(#[from] TaskError),
    /// The attendance store reported a failure.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Present/total headcount shown on the dashboard badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceSummary {
    /// Students marked present.
    pub present: usize,
    /// Students on the roster.
    pub total: usize,
}

impl std::fmt::Display for AttendanceSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Present: {}/{}", self.present, self.total)
    }
}

/// Engine state for one class section.
pub struct Console<S: ScanSource, P: AttendanceStore> {
    section: String,
    roster: RosterStore,
    session: AttendanceSession<S>,
    tasks: TaskBoard,
    store: P,
}

impl<S: ScanSource, P: AttendanceStore> Console<S, P> {
    /// Assembles a console from its parts.
    pub fn new(
        section: impl Into<String>,
        roster: RosterStore,
        session: AttendanceSession<S>,
        store: P,
    ) -> Self {
        Self {
            section: section.into(),
            roster,
            session,
            tasks: TaskBoard::new(),
            store,
        }
    }

    /// Builds a console from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::DuplicateId`] if the configured roster repeats an ID.
    pub fn from_config(config: &ConsoleConfig, source: S, store: P) -> Result<Self, RosterError> {
        let roster = RosterStore::new(config.students.clone())?;
        let session = AttendanceSession::new(config.session, source);
        Ok(Self::new(config.section.clone(), roster, session, store))
    }

    // -- Commands --

    /// Flips one student's attendance flag and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Roster`] if the student is unknown.
    pub fn toggle_attendance(&mut self, id: StudentId) -> Result<bool, ConsoleError> {
        Ok(self.roster.toggle_presence(id)?)
    }

    /// Discards unsaved manual attendance edits.
    pub fn reset_roster(&mut self) {
        self.roster.reset();
    }

    /// Hands the current attendance to the store.
    ///
    /// Returns the number of students saved.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Persistence`] with the store's own error; the
    /// save is not retried.
    pub async fn save_attendance(&self) -> Result<usize, ConsoleError> {
        let record = AttendanceRecord::from_students(&self.section, now_ms(), self.roster.list());
        match self.store.save(&record).await {
            Ok(()) => {
                tracing::info!(
                    section = %self.section,
                    participants = record.participants(),
                    present = record.present_count(),
                    "attendance saved"
                );
                Ok(record.participants())
            }
            Err(e) => {
                tracing::warn!(section = %self.section, error = %e, "attendance save failed");
                Err(e.into())
            }
        }
    }

    /// Opens a fresh QR check-in window bounded by the roster size.
    pub fn start_qr_session(&self) -> SessionSnapshot {
        self.session.start(self.roster.len())
    }

    /// Closes the QR window, e.g. when the caller navigates away.
    pub fn stop_qr_session(&self) -> bool {
        self.session.stop()
    }

    /// Delivers one countdown tick by hand.
    ///
    /// Only takes effect when the session is configured with
    /// [`Countdown::Manual`](crate::session::Countdown::Manual); a
    /// timer-driven window ignores it and returns [`TickOutcome::Idle`].
    pub fn tick(&self) -> TickOutcome {
        self.session.tick()
    }

    /// Marks an identified student present through the QR window.
    ///
    /// A student who was absent also counts as a scan while the window is
    /// open. Returns `true` if the student was newly marked present.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Roster`] if the student is unknown.
    pub fn check_in(&mut self, id: StudentId) -> Result<bool, ConsoleError> {
        let was_present = self.roster.get(id).ok_or(RosterError::NotFound(id))?.present;
        if was_present {
            return Ok(false);
        }
        self.roster.set_present(id, true)?;
        self.session.report_arrival();
        tracing::debug!(student = %id, "student checked in");
        Ok(true)
    }

    /// Creates a task expecting one submission per rostered student.
    pub fn create_task(&mut self, form: TaskForm) -> Task {
        self.tasks.create(form, self.roster.len())
    }

    /// Counts one completed submission for a task.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Task`] if the task is unknown or already full.
    pub fn record_submission(&mut self, id: &TaskId) -> Result<u32, ConsoleError> {
        Ok(self.tasks.record_submission(id)?)
    }

    // -- Queries --

    /// Class section label.
    #[must_use]
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Students in roster order.
    #[must_use]
    pub fn roster(&self) -> &[Student] {
        self.roster.list()
    }

    /// Present/total headcount.
    #[must_use]
    pub fn attendance_summary(&self) -> AttendanceSummary {
        AttendanceSummary {
            present: self.roster.present_count(),
            total: self.roster.len(),
        }
    }

    /// Current QR session state.
    #[must_use]
    pub fn session(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Whether the QR window's timers are installed.
    #[must_use]
    pub fn session_timers_running(&self) -> bool {
        self.session.timers_running()
    }

    /// Tasks in creation order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        self.tasks.list()
    }

    /// The `n` newest tasks, newest first.
    pub fn recent_tasks(&self, n: usize) -> impl Iterator<Item = &Task> {
        self.tasks.recent(n)
    }

    /// Full leaderboard, highest points first.
    #[must_use]
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry<'_>> {
        leaderboard::rank(self.roster.list())
    }

    /// Leaderboard preview limited to `n` rows.
    #[must_use]
    pub fn leaderboard_top(&self, n: usize) -> Vec<LeaderboardEntry<'_>> {
        leaderboard::top(self.roster.list(), n)
    }

    /// The persistence collaborator.
    #[must_use]
    pub const fn store(&self) -> &P {
        &self.store
    }
}

/// Returns the current timestamp in milliseconds since epoch.
fn now_ms() -> u64 {
    u64::try_from(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis(),
    )
    .unwrap_or(u64::MAX)
}
