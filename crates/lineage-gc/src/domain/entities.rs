//! Core entities for Lineage GC

use serde::{Deserialize, Serialize};
use shared_types::{LedgerTransaction, OutputRef, TxId};
use std::collections::HashMap;

/// Direct-access lookup structures over one snapshot.
///
/// Both maps borrow from the snapshot they were built from, so an index
/// can never outlive or drift from its snapshot.
#[derive(Debug, Clone, Default)]
pub struct GraphIndex<'a> {
    /// Consumed output -> transaction whose inputs contain it
    pub consumer_of: HashMap<OutputRef, &'a LedgerTransaction>,
    /// Produced output -> transaction owning the slot
    pub producer_of: HashMap<OutputRef, &'a LedgerTransaction>,
}

impl<'a> GraphIndex<'a> {
    pub fn new() -> Self {
        Self {
            consumer_of: HashMap::new(),
            producer_of: HashMap::new(),
        }
    }

    /// Transaction consuming `output`, if any is known.
    pub fn consumer(&self, output: &OutputRef) -> Option<&'a LedgerTransaction> {
        self.consumer_of.get(output).copied()
    }

    /// Transaction producing `output`, if it is in the snapshot.
    pub fn producer(&self, output: &OutputRef) -> Option<&'a LedgerTransaction> {
        self.producer_of.get(output).copied()
    }

    /// An output no known transaction consumes.
    pub fn is_unspent(&self, output: &OutputRef) -> bool {
        !self.consumer_of.contains_key(output)
    }

    /// True when at least one output slot of `tx` is unspent.
    pub fn is_frontier(&self, tx: &LedgerTransaction) -> bool {
        tx.outputs().any(|output| self.is_unspent(&output))
    }

    /// Number of consumed outputs indexed
    pub fn consumed_count(&self) -> usize {
        self.consumer_of.len()
    }

    /// Number of produced outputs indexed
    pub fn produced_count(&self) -> usize {
        self.producer_of.len()
    }
}

/// Transactions (and the outputs they owned) judged safe to delete.
///
/// The collector emits both lists sorted ascending. `new` and the
/// persistence codec keep whatever order they are given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionResult {
    pub collectible_transactions: Vec<TxId>,
    pub collectible_outputs: Vec<OutputRef>,
}

impl CollectionResult {
    pub fn new(collectible_transactions: Vec<TxId>, collectible_outputs: Vec<OutputRef>) -> Self {
        Self {
            collectible_transactions,
            collectible_outputs,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of collectible transactions
    pub fn len(&self) -> usize {
        self.collectible_transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collectible_transactions.is_empty()
    }

    /// Linear scan; decoded and hand-built results need not be sorted.
    pub fn contains(&self, tx_id: &TxId) -> bool {
        self.collectible_transactions.contains(tx_id)
    }

    /// Drop the output list, keeping only transaction ids.
    pub fn without_outputs(mut self) -> Self {
        self.collectible_outputs.clear();
        self
    }
}

/// Counters describing one collector run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    /// Transactions in the snapshot
    pub snapshot_size: usize,
    /// Transactions holding at least one unspent output
    pub frontier_size: usize,
    /// Transactions protected by the sweep
    pub live_count: usize,
    /// Transactions left as garbage
    pub collectible_count: usize,
}

/// Outcome of a full service pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcReport {
    pub stats: CollectionStats,
    pub result: CollectionResult,
    /// Transactions physically removed by the pruner (0 when not pruned)
    pub deleted_count: usize,
}
