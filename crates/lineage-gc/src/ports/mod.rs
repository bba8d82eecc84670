//! Ports module for Lineage GC
//!
//! Defines inbound (API) and outbound (SPI) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::LedgerGcApi;
pub use outbound::{CollectionRecordStore, SnapshotProvider, TransactionPruner};
