//! Common utility for extended `std` types
//!
//! These are left public for convenience.
//!
//! For example, squeezing a real number into an 8-column bulk data field or
//! blanking an unset optional value are useful everywhere.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod field_ext;
mod option_ext;
mod sort_ext;

// Flatten
pub use field_ext::FieldExt;
pub use option_ext::OptionExt;
pub use sort_ext::SortExt;
