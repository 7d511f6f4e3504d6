//! Track list handling: the model, the file collector and tag extraction.
//!
//! The track list is built once from command-line arguments and replaced
//! wholesale on a new selection, never edited in place.

mod model;
mod scan;
pub mod tags;

pub use model::*;
pub use scan::*;
pub use tags::{TagError, TagRecord};

#[cfg(test)]
mod tests;
