//! Roster store for one class section.
//!
//! [`RosterStore`] owns the students and their attendance flags. It keeps a
//! copy of the roster as it was defined so unsaved manual edits can be
//! discarded with [`RosterStore::reset`].

use std::collections::HashSet;

use classroom_proto::student::{Student, StudentId};

/// Errors that can occur during roster operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RosterError {
    /// No student with the given ID is on the roster.
    #[error("student not found: {0}")]
    NotFound(StudentId),
    /// Two roster entries share an ID.
    #[error("duplicate student id: {0}")]
    DuplicateId(StudentId),
}

/// Ordered, mutable list of students.
#[derive(Debug, Clone)]
pub struct RosterStore {
    /// Current state, in definition order.
    students: Vec<Student>,
    /// The roster as originally defined.
    original: Vec<Student>,
}

impl RosterStore {
    /// Creates a roster from its definition.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::DuplicateId`] if two students share an ID.
    pub fn new(students: Vec<Student>) -> Result<Self, RosterError> {
        let mut seen = HashSet::with_capacity(students.len());
        for student in &students {
            if !seen.insert(student.id) {
                return Err(RosterError::DuplicateId(student.id));
            }
        }
        Ok(Self {
            original: students.clone(),
            students,
        })
    }

    /// Students in definition order.
    #[must_use]
    pub fn list(&self) -> &[Student] {
        &self.students
    }

    /// Looks up one student.
    #[must_use]
    pub fn get(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Number of students on the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Whether the roster has no students.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Number of students currently marked present.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.students.iter().filter(|s| s.present).count()
    }

    /// Flips the attendance flag of one student and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::NotFound`] if `id` is not on the roster.
    pub fn toggle_presence(&mut self, id: StudentId) -> Result<bool, RosterError> {
        let student = self.get_mut(id)?;
        student.present = !student.present;
        tracing::debug!(student = %id, present = student.present, "attendance toggled");
        Ok(student.present)
    }

    /// Sets the attendance flag of one student, as a check-in does.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::NotFound`] if `id` is not on the roster.
    pub fn set_present(&mut self, id: StudentId, present: bool) -> Result<(), RosterError> {
        self.get_mut(id)?.present = present;
        Ok(())
    }

    /// Restores every student to the roster definition, discarding edits.
    pub fn reset(&mut self) {
        self.students.clone_from(&self.original);
        tracing::debug!(students = self.students.len(), "roster reset");
    }

    fn get_mut(&mut self, id: StudentId) -> Result<&mut Student, RosterError> {
        self.students
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RosterError::NotFound(id))
    }
}

/// The five-student demo roster used when no class is configured.
#[must_use]
pub fn demo_roster() -> Vec<Student> {
    vec![
        Student::new(1, "Aarav Patel", true, 95),
        Student::new(2, "Bianca Singh", true, 88),
        Student::new(3, "Chetan Kumar", false, 72),
        Student::new(4, "Disha Mehta", true, 81),
        Student::new(5, "Emil Roy", false, 65),
    ]
}
