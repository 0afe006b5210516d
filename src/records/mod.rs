// src/records/mod.rs
//! Readers that turn delimited text into records of string cells.

pub mod file;
pub mod stream;

pub use file::{read_records, RecordFile};
pub use stream::{count_lines, stream_records, RecordStream};

/// One input row, one `String` per field.
pub type Record = Vec<String>;

/// Capacity of the buffered reader behind the async record stream.
pub const READ_BUFFER_SIZE: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOptions {
    pub delimiter: u8,
    /// Treat the first record as column names.
    pub has_header: bool,
    /// Honour `"` quoting (sync reader only).
    pub quoting: bool,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            has_header: false,
            quoting: false,
        }
    }
}
