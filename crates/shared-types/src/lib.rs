//! # Shared Types Crate
//!
//! Ledger data model used by the garbage collector and its collaborators.
//!
//! ## Design Principles
//!
//! - **Content Addressing**: a transaction is identified by the SHA3-256
//!   hash of its canonical encoding (`TxId`).
//! - **Immutable Records**: transactions are never mutated; storage only
//!   ever appends or physically deletes whole records.
//! - **Unique Slots**: an `OutputRef` names exactly one output slot of
//!   exactly one transaction.

pub mod entities;

pub use entities::*;
