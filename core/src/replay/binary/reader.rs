//! Log reader

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read};

use crate::replay::ReplayError;
use crate::replay::types::{EntryKind, FORMAT_VERSION, InputSample, StreamKind};

/// Reads entries back from a nondeterminism log stream.
///
/// A stream that ends inside an entry is treated the same as one that ends
/// before it: the log is exhausted.
pub struct LogReader<R: Read> {
    reader: R,
    version: Option<u8>,
    consumed: u64,
}

impl<R: Read> LogReader<R> {
    /// Create a reader, consuming the version byte if present
    pub fn new(mut reader: R) -> Result<Self, ReplayError> {
        let version = read_version(&mut reader, StreamKind::Log)?;
        Ok(Self {
            reader,
            version,
            consumed: 0,
        })
    }

    /// Format version, `None` for an empty stream
    pub fn version(&self) -> Option<u8> {
        self.version
    }

    /// Entries successfully read so far
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn read_input(&mut self) -> Result<InputSample, ReplayError> {
        let mut raw = [0u8; 4];
        self.fill(&mut raw, EntryKind::Input)?;
        let mut fields = &raw[..];
        let p1 = fields.read_u16::<LittleEndian>()?;
        let p2 = fields.read_u16::<LittleEndian>()?;
        self.consumed += 1;
        Ok(InputSample::new(p1, p2))
    }

    pub fn read_random(&mut self) -> Result<i32, ReplayError> {
        let mut raw = [0u8; 4];
        self.fill(&mut raw, EntryKind::Random)?;
        let value = (&raw[..]).read_i32::<LittleEndian>()?;
        self.consumed += 1;
        Ok(value)
    }

    /// Read a storage read outcome.
    ///
    /// On a recorded success the payload (exactly `buf.len()` bytes) is
    /// copied into `buf`. On a recorded failure `buf` is left untouched.
    pub fn read_storage_read(&mut self, buf: &mut [u8]) -> Result<bool, ReplayError> {
        let mut flag = [0u8; 1];
        self.fill(&mut flag, EntryKind::StorageRead)?;
        if flag[0] == 0 {
            self.consumed += 1;
            return Ok(false);
        }

        let mut payload = vec![0u8; buf.len()];
        self.fill(&mut payload, EntryKind::StorageRead)?;
        buf.copy_from_slice(&payload);
        self.consumed += 1;
        Ok(true)
    }

    fn fill(&mut self, buf: &mut [u8], entry: EntryKind) -> Result<(), ReplayError> {
        self.reader.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => ReplayError::LogExhausted {
                entry,
                consumed: self.consumed,
            },
            _ => ReplayError::Io(e),
        })
    }
}

/// Read the leading version byte of a session stream.
///
/// Returns `None` when the stream is empty.
pub(crate) fn read_version<R: Read>(
    reader: &mut R,
    stream: StreamKind,
) -> Result<Option<u8>, ReplayError> {
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    if byte[0] != FORMAT_VERSION {
        return Err(ReplayError::UnsupportedVersion {
            stream,
            version: byte[0],
        });
    }
    Ok(Some(byte[0]))
}
