//! Deterministic replay
//!
//! A session is either recorded or replayed, never both. While recording,
//! every value the host consumes that could differ between runs is appended
//! to the nondeterminism log (`.dem`). While replaying, the same values are
//! handed back in the same order.
//!
//! # Ordering contract
//!
//! The log is untagged: the kind of each entry is implied purely by the
//! order of calls. The host must therefore make exactly the same sequence of
//! `Player::next_*` calls during replay as it made `Recorder::log_*` calls
//! while recording. Any divergence reads garbage rather than failing loudly,
//! and running off the end of the log is fatal.
//!
//! ```text
//! recording:  input → Recorder::log_input  → .dem
//!             rand  → Recorder::log_random → .dem
//!             read  → Recorder::log_storage_read → .dem
//!
//! replaying:  .dem → Player::next_input / next_random / next_storage_read
//! ```
//!
//! A second stream, the session index (`.inf`), holds one record per
//! completed attempt so playback can fast-forward to a chosen attempt.

pub mod binary;
mod error;
mod index;
pub mod runtime;
pub mod types;

pub use binary::{LogReader, LogWriter};
pub use error::ReplayError;
pub use index::{SessionIndexReader, SessionIndexWriter};
pub use runtime::{Player, Recorder};
pub use types::{
    EntryCounts, EntryKind, FORMAT_VERSION, InputSample, PlayTime, SessionIndexRecord, StreamKind,
};
