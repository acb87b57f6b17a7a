//! Class task types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::student::StudentId;

/// Unique identifier for a task, based on UUID v7 for time-ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who a task is handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AssignTo {
    /// Every student on the roster.
    #[default]
    WholeClass,
    /// A single student. Not checked against the roster.
    Student(StudentId),
}

impl std::fmt::Display for AssignTo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WholeClass => write!(f, "class"),
            Self::Student(id) => write!(f, "student {id}"),
        }
    }
}

/// A task created by the teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier (UUID v7, time-ordered).
    pub id: TaskId,
    /// Display label. May be empty.
    pub title: String,
    /// Free-form details.
    pub description: String,
    /// Optional due date.
    pub deadline: Option<NaiveDate>,
    /// Audience of the task.
    pub assign_to: AssignTo,
    /// Completed submissions; never exceeds `total`.
    pub submitted: u32,
    /// Roster size when the task was created.
    pub total: u32,
}

impl Task {
    /// Whether every expected submission has arrived.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.submitted >= self.total
    }
}
