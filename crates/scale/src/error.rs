//! Result and Error types for fetools-scale

/// Type alias for Result<T, scale::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `fetools-scale` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IoError(#[from] std::io::Error),

    #[error("bulk data error")]
    BulkError(#[from] fetools_bulk::Error),

    #[error("scale spec references unknown file index {0}")]
    UnknownFile(usize),

    #[error("scale factor {factor} for file index {file} is not finite")]
    BadFactor { file: usize, factor: f64 },
}
