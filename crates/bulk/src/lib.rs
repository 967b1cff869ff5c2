//! Module for working with Nastran bulk data decks
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod case;
mod catalog;
mod error;
mod field;
mod mass_props;
mod model;
mod registry;
mod remap;
mod writer;
mod xref;

pub mod cards;
pub mod reader;

// Inline anything important for a nice public API
#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use field::{Field, Fields};

#[doc(inline)]
pub use registry::{family, Family};

#[doc(inline)]
pub use catalog::{extract_card_info, FileCatalog, IncludeCatalog};

#[doc(inline)]
pub use model::{Model, SectionLines};

#[doc(inline)]
pub use reader::{read_deck, read_deck_with, DeckReader, ReadOptions};

#[doc(inline)]
pub use case::CaseControl;

#[doc(inline)]
pub use remap::IdMaps;

#[doc(inline)]
pub use writer::{DeckWriter, WriteReport};

#[doc(inline)]
pub use xref::{DanglingRef, Xref};

#[doc(inline)]
pub use mass_props::{element_mass, mass_by_file, mass_element_mass, wtmass};
