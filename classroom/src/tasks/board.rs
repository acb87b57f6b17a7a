//! Append-only list of class tasks.

use classroom_proto::task::{Task, TaskId};

use super::{TaskError, TaskForm};

/// Owns created tasks in creation order.
#[derive(Debug, Default)]
pub struct TaskBoard {
    tasks: Vec<Task>,
}

impl TaskBoard {
    /// Creates an empty board.
    #[must_use]
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Appends a task built from `form`, expecting `roster_size` submissions.
    pub fn create(&mut self, form: TaskForm, roster_size: usize) -> Task {
        let task = Task {
            id: TaskId::new(),
            title: form.title,
            description: form.description,
            deadline: form.deadline,
            assign_to: form.assign_to,
            submitted: 0,
            total: u32::try_from(roster_size).unwrap_or(u32::MAX),
        };
        tracing::info!(task = %task.id, total = task.total, assign_to = %task.assign_to, "task created");
        self.tasks.push(task.clone());
        task
    }

    /// All tasks, oldest first.
    #[must_use]
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    /// The `n` most recently created tasks, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Task> {
        self.tasks.iter().rev().take(n)
    }

    /// Looks up one task.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == *id)
    }

    /// Counts one completed submission and returns the new count.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::NotFound`] for an unknown task, or
    /// [`TaskError::SubmissionsComplete`] once `submitted` has reached `total`.
    pub fn record_submission(&mut self, id: &TaskId) -> Result<u32, TaskError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or(TaskError::NotFound(*id))?;
        if task.is_complete() {
            return Err(TaskError::SubmissionsComplete {
                task: task.id,
                total: task.total,
            });
        }
        task.submitted += 1;
        tracing::debug!(task = %task.id, submitted = task.submitted, total = task.total, "submission recorded");
        Ok(task.submitted)
    }

    /// Number of tasks on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the board has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
