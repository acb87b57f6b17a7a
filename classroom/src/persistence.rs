//! Persistence collaborator for saved attendance.
//!
//! The engine only defines the contract: an [`AttendanceRecord`] goes in,
//! success or a [`PersistenceError`] comes out. Failures are returned to
//! the caller as-is; retry policy belongs to the store.

use std::future::Future;

use classroom_proto::attendance::AttendanceRecord;
use classroom_proto::codec::{self, CodecError};
use tokio::sync::Mutex;

/// Errors reported by an [`AttendanceStore`].
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The backing service could not be reached.
    #[error("attendance store unavailable: {0}")]
    Unavailable(String),
    /// The backing service refused the record.
    #[error("attendance record rejected: {0}")]
    Rejected(String),
    /// The record could not be encoded.
    #[error("failed to encode attendance record: {0}")]
    Encode(#[from] CodecError),
}

/// Destination for finalized attendance.
pub trait AttendanceStore: Send + Sync {
    /// Persist one attendance record.
    fn save(
        &self,
        record: &AttendanceRecord,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;
}

/// Process-local store holding encoded records.
///
/// Nothing survives the process; this is the store used when no backend
/// is configured, and in tests.
#[derive(Debug, Default)]
pub struct InMemoryAttendanceStore {
    saved: Mutex<Vec<Vec<u8>>>,
}

impl InMemoryAttendanceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records saved so far.
    pub async fn len(&self) -> usize {
        self.saved.lock().await.len()
    }

    /// Whether nothing has been saved.
    pub async fn is_empty(&self) -> bool {
        self.saved.lock().await.is_empty()
    }

    /// Decodes the most recently saved record.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if the stored bytes cannot be decoded.
    pub async fn latest(&self) -> Result<Option<AttendanceRecord>, CodecError> {
        let saved = self.saved.lock().await;
        saved.last().map(|bytes| codec::decode(bytes)).transpose()
    }
}

impl AttendanceStore for InMemoryAttendanceStore {
    async fn save(&self, record: &AttendanceRecord) -> Result<(), PersistenceError> {
        let bytes = codec::encode(record)?;
        self.saved.lock().await.push(bytes);
        Ok(())
    }
}
