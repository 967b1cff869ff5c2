//! Module for reading binary result files
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod reader;
mod records;
mod tables;
mod writer;

// Inline anything important for a nice public API
#[doc(inline)]
pub use error::Error;

#[doc(inline)]
pub use reader::read_op2;

#[doc(inline)]
pub use tables::{
    EigenMode, Eigenvalues, ElementFamily, Op2, ResultTable, StrainEnergy, VectorKind,
};

#[doc(inline)]
pub use writer::write_json;
