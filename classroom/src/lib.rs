//! Classroom console engine: roster, QR attendance sessions, tasks and
//! the points leaderboard for one class section.

pub mod config;
pub mod console;
pub mod leaderboard;
pub mod persistence;
pub mod roster;
pub mod session;
pub mod tasks;
