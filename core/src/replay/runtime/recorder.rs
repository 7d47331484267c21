//! Nondeterminism recorder
//!
//! Records every value the host consumes that a replay must reproduce.

use std::io::Write;

use crate::replay::ReplayError;
use crate::replay::binary::LogWriter;
use crate::replay::types::{EntryCounts, EntryKind, InputSample};

/// Recording half of a session.
///
/// Every call appends its entry immediately, in call order. Nothing is
/// reordered or batched beyond the stream's own buffering.
pub struct Recorder<W: Write> {
    writer: LogWriter<W>,
    counts: EntryCounts,
}

impl<W: Write> Recorder<W> {
    /// Start a recording on `log`, writing the format version byte
    pub fn new(log: W) -> Result<Self, ReplayError> {
        Ok(Self {
            writer: LogWriter::new(log)?,
            counts: EntryCounts::default(),
        })
    }

    /// Record one input sample (both players)
    pub fn log_input(&mut self, sample: InputSample) -> Result<(), ReplayError> {
        self.writer.write_input(sample)?;
        self.counts.bump(EntryKind::Input);
        Ok(())
    }

    /// Record one random draw
    pub fn log_random(&mut self, value: i32) -> Result<(), ReplayError> {
        self.writer.write_random(value)?;
        self.counts.bump(EntryKind::Random);
        Ok(())
    }

    /// Record a storage read. `None` means the read failed; on success the
    /// whole requested buffer is stored.
    pub fn log_storage_read(&mut self, payload: Option<&[u8]>) -> Result<(), ReplayError> {
        self.writer.write_storage_read(payload)?;
        self.counts.bump(EntryKind::StorageRead);
        Ok(())
    }

    pub fn counts(&self) -> EntryCounts {
        self.counts
    }

    /// Flush the log and hand back the stream
    pub fn finish(self) -> Result<W, ReplayError> {
        tracing::info!(
            "Recording finished: {} inputs, {} random draws, {} storage reads",
            self.counts.input,
            self.counts.random,
            self.counts.storage_read
        );
        Ok(self.writer.into_inner()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::types::FORMAT_VERSION;

    #[test]
    fn test_new_writes_version() {
        let recorder = Recorder::new(Vec::new()).unwrap();
        assert_eq!(recorder.finish().unwrap(), vec![FORMAT_VERSION]);
    }

    #[test]
    fn test_counts_per_kind() {
        let mut recorder = Recorder::new(Vec::new()).unwrap();
        recorder.log_input(InputSample::new(1, 2)).unwrap();
        recorder.log_input(InputSample::new(3, 4)).unwrap();
        recorder.log_random(7).unwrap();
        recorder.log_storage_read(None).unwrap();

        let counts = recorder.counts();
        assert_eq!(counts.input, 2);
        assert_eq!(counts.random, 1);
        assert_eq!(counts.storage_read, 1);

        // 1 version + 2 * 4 input + 4 random + 1 failed read
        assert_eq!(recorder.finish().unwrap().len(), 14);
    }

    #[test]
    fn test_successful_read_stores_payload() {
        let mut recorder = Recorder::new(Vec::new()).unwrap();
        recorder.log_storage_read(Some(&[0xAA; 8])).unwrap();
        let bytes = recorder.finish().unwrap();
        assert_eq!(bytes.len(), 1 + 1 + 8);
        assert_eq!(bytes[1], 1);
    }
}
