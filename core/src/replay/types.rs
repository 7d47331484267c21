//! Core types for the nondeterminism log and session index

use std::fmt;

use crate::input::Buttons;

/// Version byte written at the start of both the log and the index stream
pub const FORMAT_VERSION: u8 = 0;

/// Host frames per second, used to turn frame counts into play time
pub const FRAMES_PER_SECOND: i32 = 60;

/// One input sample: the combined button word of each player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InputSample {
    pub p1: u16,
    pub p2: u16,
}

impl InputSample {
    pub fn new(p1: u16, p2: u16) -> Self {
        Self { p1, p2 }
    }

    pub fn from_buttons(p1: Buttons, p2: Buttons) -> Self {
        Self::new(p1.bits(), p2.bits())
    }

    /// Player masks, dropping any bit without a logical button
    pub fn buttons(&self) -> (Buttons, Buttons) {
        (
            Buttons::from_bits_truncate(self.p1),
            Buttons::from_bits_truncate(self.p2),
        )
    }
}

/// Kind of a log entry. The log itself carries no tags; the kind at each
/// offset is implied by call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Input,
    Random,
    StorageRead,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Input => "input sample",
            Self::Random => "random draw",
            Self::StorageRead => "storage read",
        })
    }
}

/// Per-kind entry counters kept by the recorder and player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryCounts {
    pub input: u64,
    pub random: u64,
    pub storage_read: u64,
}

impl EntryCounts {
    pub fn bump(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::Input => self.input += 1,
            EntryKind::Random => self.random += 1,
            EntryKind::StorageRead => self.storage_read += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.input + self.random + self.storage_read
    }
}

/// Which of the two session streams a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Log,
    Index,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Log => "nondeterminism log",
            Self::Index => "session index",
        })
    }
}

/// One completed attempt in the session index.
///
/// Encoded as `i32 frames_played, i16 mode, i16 level, u8 grade,
/// i32 start_frame`, little-endian, 13 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionIndexRecord {
    pub frames_played: i32,
    pub mode: i16,
    pub level: i16,
    pub grade: u8,
    /// Log frame at which the attempt began
    pub start_frame: i32,
}

impl SessionIndexRecord {
    pub const ENCODED_LEN: usize = 13;

    /// Record for an attempt that just ended on `current_frame`
    pub fn new(frames_played: i32, mode: i16, level: i16, grade: u8, current_frame: i32) -> Self {
        Self {
            frames_played,
            mode,
            level,
            grade,
            start_frame: current_frame.wrapping_sub(frames_played),
        }
    }

    pub fn play_time(&self) -> PlayTime {
        PlayTime::from_frames(self.frames_played)
    }
}

/// Attempt duration in minutes, seconds and hundredths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayTime {
    pub minutes: i32,
    pub seconds: i32,
    pub hundredths: i32,
}

impl PlayTime {
    pub fn from_frames(frames: i32) -> Self {
        let frames = frames.max(0);
        Self {
            minutes: frames / (FRAMES_PER_SECOND * 60),
            seconds: frames / FRAMES_PER_SECOND % 60,
            hundredths: frames % FRAMES_PER_SECOND * 100 / FRAMES_PER_SECOND,
        }
    }
}

impl fmt::Display for PlayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.minutes, self.seconds, self.hundredths
        )
    }
}
