//! Shared model definitions for the classroom console.
//!
//! These are plain data types: the engine crate owns every mutation.

pub mod attendance;
pub mod codec;
pub mod session;
pub mod student;
pub mod task;
