//! Frame reassembly for delimiter-separated record streams
//!
//! The event stream delivers newline-delimited JSON in chunks whose boundaries
//! have nothing to do with record boundaries. [`FrameReassembler`] folds each
//! chunk into a carry-over buffer and hands back only complete records.
//!
//! The carry-over grows without limit if the delimiter never arrives. It is not
//! capped, because truncating it would corrupt the record it belongs to.

use bytes::{Buf, Bytes, BytesMut};

use crate::error::{ApiError, Result};

/// Default record delimiter: one JSON document per line
pub const DEFAULT_DELIMITER: &[u8] = b"\n";

/// Splits a chunked byte stream into complete, delimiter-stripped records
#[derive(Debug)]
pub struct FrameReassembler {
    /// Bytes received but not yet yielded as a complete record
    buffer: BytesMut,
    delimiter: Vec<u8>,
}

impl FrameReassembler {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
            delimiter: DEFAULT_DELIMITER.to_vec(),
        }
    }

    pub fn with_delimiter(delimiter: impl Into<Vec<u8>>) -> Result<Self> {
        let delimiter = delimiter.into();
        if delimiter.is_empty() {
            return Err(ApiError::Configuration(
                "record delimiter must not be empty".to_string(),
            ));
        }
        Ok(Self {
            buffer: BytesMut::new(),
            delimiter,
        })
    }

    pub fn delimiter(&self) -> &[u8] {
        &self.delimiter
    }

    /// Size of the incomplete tail currently held back
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Append a chunk and return every record it completes, in order
    ///
    /// Whatever follows the last delimiter (possibly nothing) stays buffered
    /// for the next call. A chunk without a delimiter yields nothing.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Bytes> {
        // The carry-over never holds a full delimiter, so only its last
        // `delimiter.len() - 1` bytes can start a match with the new data.
        let mut search_from = self
            .buffer
            .len()
            .saturating_sub(self.delimiter.len() - 1);
        self.buffer.extend_from_slice(chunk);

        let mut records = Vec::new();
        while let Some(offset) = find(&self.buffer[search_from..], &self.delimiter) {
            let record = self.buffer.split_to(search_from + offset).freeze();
            self.buffer.advance(self.delimiter.len());
            records.push(record);
            search_from = 0;
        }
        records
    }

    /// End of stream: drop the unterminated tail and return it, if any
    ///
    /// The returned bytes are never a record; they are handed back only so the
    /// caller can report what was lost.
    pub fn finish(&mut self) -> Option<Bytes> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.buffer.split().freeze())
        }
    }
}

impl Default for FrameReassembler {
    fn default() -> Self {
        Self::new()
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    match needle {
        [byte] => haystack.iter().position(|b| b == byte),
        _ => haystack
            .windows(needle.len())
            .position(|window| window == needle),
    }
}
