//! Result and Error types for fetools-bulk

/// Type alias for Result<T, bulk::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `fetools-bulk` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IoError(#[from] std::io::Error),

    #[error("malformed field \"{text}\" on line {line}")]
    MalformedField { line: usize, text: String },

    #[error("continuation on line {0} has no card to continue")]
    UnexpectedContinuation(usize),

    #[error("unknown card \"{0}\"")]
    UnknownCard(String),

    #[error("{card} {id}: field {index} expected {expected}, found \"{found}\"")]
    UnexpectedField {
        card: String,
        id: u32,
        index: usize,
        expected: &'static str,
        found: String,
    },

    #[error("failed to write \"{path}\": {cause}")]
    WriteError { path: String, cause: String },

    #[error("serialiser failed")]
    SerdeError(#[from] serde_json::Error),
}
