//! Binary log format
//!
//! ```text
//! version: u8
//! entry*   (no tags, kind implied by call order)
//!
//! input sample   u16 p1, u16 p2
//! random draw    i32
//! storage read   u8 success, [payload; request size] if success != 0
//! ```
//!
//! All multi-byte fields are little-endian.

mod reader;
mod writer;

pub(crate) use reader::read_version;
pub use reader::LogReader;
pub use writer::LogWriter;
