//! Session index: one record per completed attempt
//!
//! Lets playback jump to a specific attempt inside one long log without
//! scanning the log itself.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use tracing::info;

use super::ReplayError;
use super::binary::read_version;
use super::types::{FORMAT_VERSION, SessionIndexRecord, StreamKind};

/// Appends attempt records while recording
pub struct SessionIndexWriter<W: Write> {
    writer: W,
    records: usize,
}

impl<W: Write> SessionIndexWriter<W> {
    /// Create a writer and emit the format version byte
    pub fn new(mut writer: W) -> io::Result<Self> {
        writer.write_u8(FORMAT_VERSION)?;
        Ok(Self { writer, records: 0 })
    }

    pub fn append(&mut self, record: &SessionIndexRecord) -> io::Result<()> {
        self.writer.write_i32::<LittleEndian>(record.frames_played)?;
        self.writer.write_i16::<LittleEndian>(record.mode)?;
        self.writer.write_i16::<LittleEndian>(record.level)?;
        self.writer.write_u8(record.grade)?;
        self.writer.write_i32::<LittleEndian>(record.start_frame)?;
        self.records += 1;
        Ok(())
    }

    /// Number of records appended so far
    pub fn len(&self) -> usize {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    pub fn into_inner(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Reads attempt records during playback
pub struct SessionIndexReader<R: Read> {
    reader: R,
    version: Option<u8>,
}

impl<R: Read> SessionIndexReader<R> {
    /// Create a reader, consuming the version byte if present
    pub fn new(mut reader: R) -> Result<Self, ReplayError> {
        let version = read_version(&mut reader, StreamKind::Index)?;
        Ok(Self { reader, version })
    }

    /// Format version, `None` for an empty stream
    pub fn version(&self) -> Option<u8> {
        self.version
    }

    /// Start frame of attempt `ordinal` (counted from 0).
    ///
    /// An index without even a version byte predates attempt tracking, so
    /// playback starts at frame 0. Otherwise a missing record is fatal.
    pub fn find_start(mut self, ordinal: usize) -> Result<i32, ReplayError> {
        if self.version.is_none() {
            return Ok(0);
        }

        let mut available = 0;
        while let Some(record) = self.next_record()? {
            if available == ordinal {
                info!(
                    "Attempt {} starts at frame {} (play time {})",
                    ordinal,
                    record.start_frame,
                    record.play_time()
                );
                return Ok(record.start_frame);
            }
            available += 1;
        }

        Err(ReplayError::AttemptNotFound { ordinal, available })
    }

    /// Every record in the index
    pub fn records(mut self) -> Result<Vec<SessionIndexRecord>, ReplayError> {
        let mut records = Vec::new();
        if self.version.is_none() {
            return Ok(records);
        }
        while let Some(record) = self.next_record()? {
            records.push(record);
        }
        Ok(records)
    }

    /// Next complete record; a truncated trailing record ends the stream
    fn next_record(&mut self) -> Result<Option<SessionIndexRecord>, ReplayError> {
        let mut raw = [0u8; SessionIndexRecord::ENCODED_LEN];
        match self.reader.read_exact(&mut raw) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let mut fields = &raw[..];
        Ok(Some(SessionIndexRecord {
            frames_played: fields.read_i32::<LittleEndian>()?,
            mode: fields.read_i16::<LittleEndian>()?,
            level: fields.read_i16::<LittleEndian>()?,
            grade: fields.read_u8()?,
            start_frame: fields.read_i32::<LittleEndian>()?,
        }))
    }
}
