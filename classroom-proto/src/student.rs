//! Student identity and roster entries.

use serde::{Deserialize, Serialize};

/// Stable identifier of a student within one class roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StudentId(u32);

impl StudentId {
    /// Wraps a raw roster number.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw roster number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for StudentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// One student on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique for the lifetime of the roster.
    pub id: StudentId,
    /// Display name.
    pub name: String,
    /// Attendance flag for the current class.
    pub present: bool,
    /// Score used only for ranking.
    pub points: u32,
}

impl Student {
    /// Creates a student record.
    pub fn new(id: u32, name: impl Into<String>, present: bool, points: u32) -> Self {
        Self {
            id: StudentId::new(id),
            name: name.into(),
            present,
            points,
        }
    }

    /// First letter of the student's first name, used as an avatar glyph.
    #[must_use]
    pub fn initial(&self) -> Option<char> {
        self.name.split_whitespace().next()?.chars().next()
    }
}
