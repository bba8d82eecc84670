//! # Lineage GC: Ledger Garbage Collector
//!
//! Finds the transactions of a UTXO-style ledger that can be deleted from
//! local storage without losing the ability to validate or replay anything
//! that still matters.
//!
//! A transaction is **live** when it holds an unspent output (frontier) or
//! is connected, through any chain of produce/consume links, to one that
//! does. Everything else is garbage.
//!
//! ## Architecture
//!
//! - **Domain**: Core entities (GraphIndex, CollectionResult), errors,
//!   invariant checks, the pending-collection record codec
//! - **Algorithms**: Graph indexer, lineage reachability collector
//! - **Ports**: Inbound (LedgerGcApi) and Outbound (SnapshotProvider,
//!   TransactionPruner, CollectionRecordStore)
//! - **Adapters**: In-memory ledger, in-memory and file record stores
//! - **Application**: Service orchestration
//!
//! ## Pipeline
//!
//! ```text
//! SnapshotProvider ──snapshot──→ [validate] → [index] → [collect] → CollectionResult
//!                                                                      │
//!                                      CollectionRecordStore ←─encode──┤
//!                                                                      ↓
//!                                                        TransactionPruner (delete)
//! ```

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{FileRecordStore, InMemoryLedger, InMemoryRecordStore};
pub use algorithms::{build_indexes, collect, collect_with_stats, find_frontier, validate_snapshot};
pub use application::LedgerGcService;
pub use config::GcConfig;
pub use domain::entities::*;
pub use domain::errors::{CodecError, GcError, StoreError};
pub use domain::invariants;
pub use domain::persistence::CollectionRecordCodec;
pub use ports::inbound::LedgerGcApi;
pub use ports::outbound::{CollectionRecordStore, SnapshotProvider, TransactionPruner};
