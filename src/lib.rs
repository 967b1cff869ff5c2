//! A modular toolkit of fast and reliable libraries for Nastran model
//! processing
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Flatten the default crates
#[doc(inline)]
pub use fetools_bulk as bulk;

#[doc(inline)]
pub use fetools_utils as utils;

// Re-exports of crates that are behind feature flags
#[cfg(feature = "op2")]
#[cfg_attr(docsrs, doc(cfg(feature = "op2")))]
#[doc(inline)]
pub use fetools_op2 as op2;

#[cfg(feature = "partition")]
#[cfg_attr(docsrs, doc(cfg(feature = "partition")))]
#[doc(inline)]
pub use fetools_partition as partition;

#[cfg(feature = "renumber")]
#[cfg_attr(docsrs, doc(cfg(feature = "renumber")))]
#[doc(inline)]
pub use fetools_renumber as renumber;

#[cfg(feature = "scale")]
#[cfg_attr(docsrs, doc(cfg(feature = "scale")))]
#[doc(inline)]
pub use fetools_scale as scale;
