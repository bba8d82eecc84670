//! Domain invariants for Lineage GC
//!
//! Independent checks of a collection result against its snapshot. They do
//! not reuse the collector's sweep: completeness is checked with a
//! union-find over consumption edges.

use super::entities::{CollectionResult, GraphIndex};
use super::errors::GcError;
use shared_types::{LedgerTransaction, TxId};
use std::collections::{HashMap, HashSet};

/// INVARIANT-1: Frontier Safety
/// No transaction holding an unspent output is collectible.
pub fn invariant_frontier_safety(
    snapshot: &[LedgerTransaction],
    index: &GraphIndex<'_>,
    result: &CollectionResult,
) -> bool {
    let garbage = garbage_set(result);
    snapshot
        .iter()
        .filter(|tx| index.is_frontier(tx))
        .all(|tx| !garbage.contains(&tx.id))
}

/// INVARIANT-2: Forward Closure
/// If a consumer is live, its producer is live (ancestors of live
/// transactions are never deleted).
pub fn invariant_forward_closure(
    snapshot: &[LedgerTransaction],
    index: &GraphIndex<'_>,
    result: &CollectionResult,
) -> bool {
    let garbage = garbage_set(result);
    edges(snapshot, index)
        .into_iter()
        .all(|(producer, consumer)| garbage.contains(&consumer) || !garbage.contains(&producer))
}

/// INVARIANT-3: Backward Closure
/// If a producer is live, every consumer of its outputs is live.
pub fn invariant_backward_closure(
    snapshot: &[LedgerTransaction],
    index: &GraphIndex<'_>,
    result: &CollectionResult,
) -> bool {
    let garbage = garbage_set(result);
    edges(snapshot, index)
        .into_iter()
        .all(|(producer, consumer)| garbage.contains(&producer) || !garbage.contains(&consumer))
}

/// INVARIANT-4: Completeness
/// Collectible exactly when no frontier transaction is connected to it,
/// in any mix of directions.
pub fn invariant_completeness(
    snapshot: &[LedgerTransaction],
    index: &GraphIndex<'_>,
    result: &CollectionResult,
) -> bool {
    garbage_set(result) == expected_garbage(snapshot, index)
}

/// Run every invariant, reporting the first violation.
pub fn verify_collection(
    snapshot: &[LedgerTransaction],
    index: &GraphIndex<'_>,
    result: &CollectionResult,
) -> Result<(), GcError> {
    if !invariant_frontier_safety(snapshot, index, result) {
        return Err(GcError::InvariantViolation(
            "frontier transaction marked collectible".to_string(),
        ));
    }
    if !invariant_forward_closure(snapshot, index, result) {
        return Err(GcError::InvariantViolation(
            "ancestor of a live transaction marked collectible".to_string(),
        ));
    }
    if !invariant_backward_closure(snapshot, index, result) {
        return Err(GcError::InvariantViolation(
            "descendant of a live transaction marked collectible".to_string(),
        ));
    }
    if !invariant_completeness(snapshot, index, result) {
        return Err(GcError::InvariantViolation(
            "collectible set differs from disconnected components".to_string(),
        ));
    }
    Ok(())
}

/// Garbage as computed by connected components: a component is garbage
/// when it contains no frontier transaction.
pub fn expected_garbage(snapshot: &[LedgerTransaction], index: &GraphIndex<'_>) -> HashSet<TxId> {
    let mut components = UnionFind::new(snapshot.iter().map(|tx| tx.id));
    for (producer, consumer) in edges(snapshot, index) {
        components.union(producer, consumer);
    }

    let live_roots: HashSet<TxId> = snapshot
        .iter()
        .filter(|tx| index.is_frontier(tx))
        .map(|tx| components.find(tx.id))
        .collect();

    snapshot
        .iter()
        .map(|tx| tx.id)
        .filter(|id| !live_roots.contains(&components.find(*id)))
        .collect()
}

fn garbage_set(result: &CollectionResult) -> HashSet<TxId> {
    result.collectible_transactions.iter().copied().collect()
}

/// (producer, consumer) pairs for every input whose producer is known.
fn edges(snapshot: &[LedgerTransaction], index: &GraphIndex<'_>) -> Vec<(TxId, TxId)> {
    let mut edges = Vec::new();
    for consumer in snapshot {
        for input in &consumer.inputs {
            if let Some(producer) = index.producer(input) {
                edges.push((producer.id, consumer.id));
            }
        }
    }
    edges
}

struct UnionFind {
    parent: HashMap<TxId, TxId>,
}

impl UnionFind {
    fn new(ids: impl Iterator<Item = TxId>) -> Self {
        Self {
            parent: ids.map(|id| (id, id)).collect(),
        }
    }

    fn find(&mut self, id: TxId) -> TxId {
        let mut root = id;
        while let Some(&parent) = self.parent.get(&root) {
            if parent == root {
                break;
            }
            root = parent;
        }

        // Path compression
        let mut current = id;
        while current != root {
            let next = self.parent.get(&current).copied().unwrap_or(root);
            self.parent.insert(current, root);
            current = next;
        }

        root
    }

    fn union(&mut self, a: TxId, b: TxId) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent.insert(root_a, root_b);
        }
    }
}
