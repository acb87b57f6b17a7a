//! Attendance record handed to the persistence collaborator.

use serde::{Deserialize, Serialize};

use crate::student::{Student, StudentId};

/// Attendance mark for one student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    /// Which student.
    pub student: StudentId,
    /// Whether they were marked present.
    pub present: bool,
}

/// Snapshot of a roster's attendance at save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Class section the roster belongs to.
    pub section: String,
    /// Milliseconds since the Unix epoch when the record was taken.
    pub taken_at_ms: u64,
    /// One entry per student, in roster order.
    pub entries: Vec<AttendanceEntry>,
}

impl AttendanceRecord {
    /// Builds a record from roster entries.
    pub fn from_students<'a>(
        section: impl Into<String>,
        taken_at_ms: u64,
        students: impl IntoIterator<Item = &'a Student>,
    ) -> Self {
        Self {
            section: section.into(),
            taken_at_ms,
            entries: students
                .into_iter()
                .map(|s| AttendanceEntry {
                    student: s.id,
                    present: s.present,
                })
                .collect(),
        }
    }

    /// Number of students covered by this record.
    #[must_use]
    pub fn participants(&self) -> usize {
        self.entries.len()
    }

    /// Number of students marked present.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.entries.iter().filter(|e| e.present).count()
    }
}
