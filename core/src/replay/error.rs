//! Replay errors

use std::io;

use super::types::{EntryKind, StreamKind};

/// Failure while recording or replaying a session.
///
/// Everything except plain I/O while recording is fatal to a replay: once
/// the log diverges no deterministic continuation exists.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("replay log exhausted reading {entry} after {consumed} entries")]
    LogExhausted { entry: EntryKind, consumed: u64 },

    #[error("attempt {ordinal} not found in session index ({available} recorded)")]
    AttemptNotFound { ordinal: usize, available: usize },

    #[error("unsupported {stream} format version {version}")]
    UnsupportedVersion { stream: StreamKind, version: u8 },

    #[error("replay I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ReplayError {
    /// Whether the session must end
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}
