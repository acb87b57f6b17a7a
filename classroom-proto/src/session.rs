//! Observable state of a QR check-in session.

use serde::{Deserialize, Serialize};

/// Lifecycle of an attendance session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    /// No window is open.
    #[default]
    Inactive,
    /// The check-in window is open and counting down.
    Active,
    /// The window ran out on its own.
    Expired,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inactive => write!(f, "inactive"),
            Self::Active => write!(f, "active"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// Point-in-time copy of the session state handed to readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Current lifecycle state.
    pub status: SessionStatus,
    /// Seconds left in the window. Only meaningful while `Active`.
    pub remaining_secs: u32,
    /// Check-ins reported during this window.
    pub scan_count: u32,
    /// Roster size captured when the window opened; upper bound for `scan_count`.
    pub roster_size: u32,
}

impl SessionSnapshot {
    /// Formats the remaining time as `m:ss`.
    #[must_use]
    pub fn remaining_display(&self) -> String {
        format!("{}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }

    /// Whether the check-in window is open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}
