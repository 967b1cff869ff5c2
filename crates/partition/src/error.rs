//! Result and Error types for fetools-partition

/// Type alias for Result<T, partition::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `fetools-partition` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IoError(#[from] std::io::Error),

    #[error("bulk data error")]
    BulkError(#[from] fetools_bulk::Error),

    #[error("report serialiser failed")]
    SerdeError(#[from] serde_json::Error),

    #[error("deck has no structural elements to partition")]
    EmptyModel,

    #[error("merge set references unknown part id {0}")]
    UnknownPart(u32),
}
