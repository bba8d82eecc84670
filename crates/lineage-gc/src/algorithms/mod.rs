//! Algorithms module for Lineage GC
//!
//! Contains:
//! - Graph indexer (consumer/producer maps, snapshot validation)
//! - Lineage reachability collector

pub mod collector;
pub mod indexer;

pub use collector::{collect, collect_with_stats, find_frontier};
pub use indexer::{build_indexes, validate_snapshot};
