//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits for embedding and tests.

mod memory_ledger;
mod record_store;

pub use memory_ledger::InMemoryLedger;
pub use record_store::{FileRecordStore, InMemoryRecordStore};
