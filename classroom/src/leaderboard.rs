//! Points leaderboard derived from the roster.
//!
//! Nothing here is stored: every call ranks the roster it is given.

use classroom_proto::student::Student;
use serde::Serialize;

/// One ranked row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry<'a> {
    /// 1-based position; rank 1 has the most points.
    pub rank: usize,
    /// The ranked student.
    pub student: &'a Student,
}

/// Ranks students by descending points.
///
/// The sort is stable: students with equal points keep their roster order,
/// and each row gets its own position.
#[must_use]
pub fn rank(students: &[Student]) -> Vec<LeaderboardEntry<'_>> {
    let mut ordered: Vec<&Student> = students.iter().collect();
    ordered.sort_by(|a, b| b.points.cmp(&a.points));
    ordered
        .into_iter()
        .enumerate()
        .map(|(i, student)| LeaderboardEntry {
            rank: i + 1,
            student,
        })
        .collect()
}

/// The first `n` rows of [`rank`].
#[must_use]
pub fn top(students: &[Student], n: usize) -> Vec<LeaderboardEntry<'_>> {
    let mut ranked = rank(students);
    ranked.truncate(n);
    ranked
}
