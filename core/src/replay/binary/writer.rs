//! Log writer

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

use crate::replay::types::{FORMAT_VERSION, InputSample};

/// Appends entries to a nondeterminism log stream
pub struct LogWriter<W: Write> {
    writer: W,
}

impl<W: Write> LogWriter<W> {
    /// Create a writer and emit the format version byte
    pub fn new(mut writer: W) -> io::Result<Self> {
        writer.write_u8(FORMAT_VERSION)?;
        Ok(Self { writer })
    }

    pub fn write_input(&mut self, sample: InputSample) -> io::Result<()> {
        self.writer.write_u16::<LittleEndian>(sample.p1)?;
        self.writer.write_u16::<LittleEndian>(sample.p2)?;
        Ok(())
    }

    pub fn write_random(&mut self, value: i32) -> io::Result<()> {
        self.writer.write_i32::<LittleEndian>(value)
    }

    /// Write a storage read outcome; `None` records a failed read
    pub fn write_storage_read(&mut self, payload: Option<&[u8]>) -> io::Result<()> {
        match payload {
            Some(data) => {
                self.writer.write_u8(1)?;
                self.writer.write_all(data)
            }
            None => self.writer.write_u8(0),
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Flush and return the underlying stream
    pub fn into_inner(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
