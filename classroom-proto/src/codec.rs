//! Serialization of [`AttendanceRecord`]s for the persistence collaborator.
//!
//! Records travel as postcard bytes behind a one-byte format version so a
//! backend can reject payloads it does not understand.

use crate::attendance::AttendanceRecord;

/// Current payload format version.
pub const FORMAT_VERSION: u8 = 1;

/// Error type for codec encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// The payload is empty or carries an unknown version byte.
    #[error("unsupported format version: {0:?}")]
    UnsupportedVersion(Option<u8>),
}

/// Encodes an [`AttendanceRecord`] into a versioned byte vector.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the record cannot be serialized.
pub fn encode(record: &AttendanceRecord) -> Result<Vec<u8>, CodecError> {
    let body = postcard::to_allocvec(record).map_err(|e| CodecError::Serialization(e.to_string()))?;
    let mut out = Vec::with_capacity(1 + body.len());
    out.push(FORMAT_VERSION);
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decodes an [`AttendanceRecord`] produced by [`encode`].
///
/// # Errors
///
/// Returns `CodecError::UnsupportedVersion` if the version byte is missing
/// or unknown, or `CodecError::Serialization` if the body is malformed.
pub fn decode(bytes: &[u8]) -> Result<AttendanceRecord, CodecError> {
    match bytes.split_first() {
        Some((&FORMAT_VERSION, body)) => {
            postcard::from_bytes(body).map_err(|e| CodecError::Serialization(e.to_string()))
        }
        Some((&other, _)) => Err(CodecError::UnsupportedVersion(Some(other))),
        None => Err(CodecError::UnsupportedVersion(None)),
    }
}
