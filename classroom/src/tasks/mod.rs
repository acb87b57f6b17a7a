//! Task board for the class section.
//!
//! Tasks are created from a [`TaskForm`] and kept in creation order. The
//! board snapshots the roster size into each task as its expected number of
//! submissions; later roster changes do not move that total.

pub mod board;

pub use board::TaskBoard;

use chrono::NaiveDate;
use classroom_proto::task::{AssignTo, TaskId};
use thiserror::Error;

/// Errors that can occur during task operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    /// Task with the given ID was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// Every expected submission has already been recorded.
    #[error("task {task} already has all {total} submissions")]
    SubmissionsComplete {
        /// The task that was full.
        task: TaskId,
        /// Its expected submission count.
        total: u32,
    },
}

/// Input for creating a task.
///
/// `TaskForm::default()` is the cleared form: empty text, no deadline,
/// assigned to the whole class. No field is validated; an empty title
/// yields a task without a display label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    /// Display label.
    pub title: String,
    /// Free-form details.
    pub description: String,
    /// Optional due date.
    pub deadline: Option<NaiveDate>,
    /// Audience of the task.
    pub assign_to: AssignTo,
}

impl TaskForm {
    /// A whole-class form with just a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}
