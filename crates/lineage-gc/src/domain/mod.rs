//! Domain module for Lineage GC
//!
//! Contains core entities, errors, invariants and the collection record codec.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod persistence;

pub use entities::*;
pub use errors::*;
pub use persistence::{CollectionRecordCodec, RECORD_VERSION};
