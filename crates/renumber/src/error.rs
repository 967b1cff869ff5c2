//! Result and Error types for fetools-renumber

/// Type alias for Result<T, renumber::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `fetools-renumber` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IoError(#[from] std::io::Error),

    #[error("bulk data error")]
    BulkError(#[from] fetools_bulk::Error),

    #[error("range file is not valid JSON")]
    SpecError(#[from] serde_json::Error),

    #[error("range spec references unknown file \"{0}\"")]
    UnknownFile(String),

    #[error("pre-validation rejected the range spec:\n{}", .0.join("\n"))]
    Validation(Vec<String>),
}
