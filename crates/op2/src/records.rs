//! Fortran record framing
//!
//! Every record is `[length: i32][payload][length: i32]` with little
//! endian byte ordering, the Fortran unformatted default on every
//! platform the solver ships for. The reader hands out raw payloads and
//! typed views over them.

// standard library
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};

/// Buffered record-by-record reader
#[derive(Debug)]
pub(crate) struct RecordReader {
    reader: BufReader<File>,
}

impl RecordReader {
    pub(crate) fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
        })
    }

    /// Next record payload, or `None` at a clean end of file
    pub(crate) fn next_record(&mut self) -> Result<Option<Vec<u8>>> {
        let mut length_buffer = [0u8; std::mem::size_of::<i32>()];
        match self.reader.read_exact(&mut length_buffer) {
            Ok(()) => {}
            Err(cause) if cause.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Ok(None);
            }
            Err(cause) => return Err(cause.into()),
        }
        let length = i32::from_le_bytes(length_buffer);
        if length < 0 {
            return Err(Error::UnexpectedByteLength {
                expected: 0,
                found: length,
            });
        }

        let mut payload = vec![0u8; length as usize];
        self.reader
            .read_exact(&mut payload)
            .map_err(|_| Error::EndOfFile)?;

        // The trailing bookend must repeat the length
        self.reader
            .read_exact(&mut length_buffer)
            .map_err(|_| Error::EndOfFile)?;
        let bookend = i32::from_le_bytes(length_buffer);
        if bookend != length {
            return Err(Error::UnexpectedByteLength {
                expected: length,
                found: bookend,
            });
        }

        Ok(Some(payload))
    }
}

/// Interpret a payload as consecutive little-endian f32 words
pub(crate) fn as_f32_words(payload: &[u8]) -> Vec<f64> {
    payload
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as f64)
        .collect()
}

/// Interpret a payload as consecutive little-endian i32 words
pub(crate) fn as_i32_words(payload: &[u8]) -> Vec<i32> {
    payload
        .chunks_exact(4)
        .map(|chunk| i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// An 8-character ASCII table name, trailing blanks trimmed
pub(crate) fn as_table_name(payload: &[u8]) -> Result<String> {
    if payload.len() != 8 || !payload.iter().all(u8::is_ascii) {
        return Err(Error::BadTableName {
            length: payload.len(),
        });
    }
    Ok(String::from_utf8_lossy(payload).trim_end().to_string())
}

/// Is this payload plausibly a table name record?
pub(crate) fn looks_like_name(payload: &[u8]) -> bool {
    payload.len() == 8
        && payload
            .iter()
            .all(|&byte| byte == b' ' || byte.is_ascii_uppercase() || byte.is_ascii_digit())
        && payload[0].is_ascii_uppercase()
}
