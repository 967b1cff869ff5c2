//! Result and Error type
use derive_more::From;

/// Type alias for `Result<T, op2::Error>`
pub(crate) type Result<T> = core::result::Result<T, Error>;

/// The error type for `fetools-op2`
#[derive(Debug, From)]
pub enum Error {
    /// Reader has reached the end of the file mid-record
    EndOfFile,

    /// Errors from std::io
    #[from]
    Io(std::io::Error),

    /// Errors from deserialising packed records
    #[from]
    Bincode(bincode::Error),

    /// Record bookends disagree with the leading length
    UnexpectedByteLength { expected: i32, found: i32 },

    /// A table name record that is not 8 ASCII characters
    BadTableName { length: usize },

    /// A data record does not match the shape its header promised
    UnexpectedRecordShape {
        table: String,
        expected_words: usize,
        found_words: usize,
    },

    /// Decode failure inside a named table
    BinaryDecode { table: String, detail: String },

    /// Serialising the summary failed
    #[from]
    Serde(serde_json::Error),
}

// Boilerplate for the library. Anyone using the library is a developer and
// will only care about the debug form anyway. Applications should convert the
// errors to something with more readable, high-level context for the user.
impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
