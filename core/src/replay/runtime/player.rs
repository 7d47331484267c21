//! Nondeterminism player
//!
//! Hands recorded values back to the host in recording order.

use std::io::Read;

use tracing::{debug, error};

use crate::replay::ReplayError;
use crate::replay::binary::LogReader;
use crate::replay::types::{EntryCounts, EntryKind, InputSample};

/// Replaying half of a session.
///
/// `next_*` calls must be made in exactly the order the matching `log_*`
/// calls were made while recording. Running off the end of the log is
/// fatal, and once it happens every later call reports it again.
pub struct Player<R: Read> {
    reader: LogReader<R>,
    start_frame: i32,
    counts: EntryCounts,
    halted: Option<EntryKind>,
}

impl<R: Read> Player<R> {
    /// Start playback from the beginning of `log`
    pub fn new(log: R) -> Result<Self, ReplayError> {
        let reader = LogReader::new(log)?;
        if reader.version().is_none() {
            debug!("Replay log is empty");
        }
        Ok(Self {
            reader,
            start_frame: 0,
            counts: EntryCounts::default(),
            halted: None,
        })
    }

    /// Fast-forward presentation to `start_frame`
    pub fn with_start_frame(mut self, start_frame: i32) -> Self {
        self.start_frame = start_frame;
        self
    }

    pub fn start_frame(&self) -> i32 {
        self.start_frame
    }

    /// Whether a frame should reach the host's presentation.
    ///
    /// Frames up to and including the start frame are still simulated (the
    /// log must be consumed) but not shown.
    pub fn should_present(&self, frame: i32) -> bool {
        frame > self.start_frame
    }

    pub fn next_input(&mut self) -> Result<InputSample, ReplayError> {
        self.check_halted()?;
        let result = self.reader.read_input();
        self.track(EntryKind::Input, result)
    }

    pub fn next_random(&mut self) -> Result<i32, ReplayError> {
        self.check_halted()?;
        let result = self.reader.read_random();
        self.track(EntryKind::Random, result)
    }

    /// Replay a storage read into `buf`.
    ///
    /// Returns the recorded success flag. `buf` is only written when the
    /// recorded read succeeded.
    pub fn next_storage_read(&mut self, buf: &mut [u8]) -> Result<bool, ReplayError> {
        self.check_halted()?;
        let result = self.reader.read_storage_read(buf);
        self.track(EntryKind::StorageRead, result)
    }

    /// Storage writes never reach the host while replaying
    pub fn suppress_storage_write(&self) {
        debug!("Suppressed storage write during replay");
    }

    pub fn counts(&self) -> EntryCounts {
        self.counts
    }

    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    fn check_halted(&self) -> Result<(), ReplayError> {
        match self.halted {
            Some(entry) => Err(ReplayError::LogExhausted {
                entry,
                consumed: self.reader.consumed(),
            }),
            None => Ok(()),
        }
    }

    fn track<T>(
        &mut self,
        kind: EntryKind,
        result: Result<T, ReplayError>,
    ) -> Result<T, ReplayError> {
        match result {
            Ok(value) => {
                self.counts.bump(kind);
                Ok(value)
            }
            Err(e) => {
                error!("Replay stopped: {}", e);
                self.halted = Some(kind);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::Recorder;
    use std::io::Cursor;

    fn recorded(f: impl FnOnce(&mut Recorder<Vec<u8>>)) -> Cursor<Vec<u8>> {
        let mut recorder = Recorder::new(Vec::new()).unwrap();
        f(&mut recorder);
        Cursor::new(recorder.finish().unwrap())
    }

    #[test]
    fn test_failed_read_leaves_buffer_untouched() {
        let log = recorded(|r| r.log_storage_read(None).unwrap());
        let mut player = Player::new(log).unwrap();

        let mut buf = [0x55u8; 6];
        assert!(!player.next_storage_read(&mut buf).unwrap());
        assert_eq!(buf, [0x55; 6]);
    }

    #[test]
    fn test_exhaustion_is_sticky() {
        let log = recorded(|r| r.log_random(3).unwrap());
        let mut player = Player::new(log).unwrap();

        assert_eq!(player.next_random().unwrap(), 3);
        let err = player.next_input().unwrap_err();
        assert!(err.is_fatal());
        assert!(player.is_halted());

        // a later call of another kind still reports the first exhaustion
        assert!(matches!(
            player.next_random(),
            Err(ReplayError::LogExhausted {
                entry: EntryKind::Input,
                consumed: 1,
            })
        ));
    }

    #[test]
    fn test_should_present_after_start_frame() {
        let player = Player::new(Cursor::new(Vec::new()))
            .unwrap()
            .with_start_frame(120);
        assert!(!player.should_present(0));
        assert!(!player.should_present(120));
        assert!(player.should_present(121));
    }

    #[test]
    fn test_counts_consumed_entries() {
        let log = recorded(|r| {
            r.log_input(InputSample::new(0x20, 0)).unwrap();
            r.log_random(-1).unwrap();
        });
        let mut player = Player::new(log).unwrap();
        player.next_input().unwrap();
        player.next_random().unwrap();
        assert_eq!(player.counts().total(), 2);
        assert!(!player.is_halted());
    }
}
