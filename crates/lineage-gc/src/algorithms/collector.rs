//! Lineage Reachability Collector
//!
//! Mark-and-sweep over the consumption DAG. Every transaction starts as a
//! candidate for deletion; sweeping outward from each frontier transaction
//! (one holding an unspent output) removes everything connected to it:
//!
//! - **forward**: the consumers of a protected transaction's outputs
//! - **backward**: the producers of a protected transaction's inputs
//!
//! Whatever is still a candidate when the sweep ends is garbage.
//!
//! Both directions are followed from every protected transaction, not only
//! from the frontier itself. An ancestor of anything live must survive so
//! the live transaction can still be validated and replayed, and the other
//! descendants of such an ancestor stay with it.
//!
//! The sweep uses an explicit work stack; lineages can be far deeper than
//! the call stack allows. Each transaction is expanded at most once, so the
//! whole pass is O(V + E).

use crate::domain::entities::{CollectionResult, CollectionStats, GraphIndex};
use shared_types::{LedgerTransaction, OutputRef, TxId};
use std::collections::HashSet;

/// Compute the collectible set for a snapshot.
pub fn collect(snapshot: &[LedgerTransaction], index: &GraphIndex<'_>) -> CollectionResult {
    collect_with_stats(snapshot, index).0
}

/// Compute the collectible set together with run counters.
pub fn collect_with_stats(
    snapshot: &[LedgerTransaction],
    index: &GraphIndex<'_>,
) -> (CollectionResult, CollectionStats) {
    let mut candidates: HashSet<TxId> = snapshot.iter().map(|tx| tx.id).collect();
    let distinct = candidates.len();

    let frontier: Vec<&LedgerTransaction> =
        snapshot.iter().filter(|tx| index.is_frontier(tx)).collect();
    let frontier_size = frontier.len();

    sweep(frontier, index, &mut candidates);

    let result = garbage_result(snapshot, &candidates);
    let stats = CollectionStats {
        snapshot_size: snapshot.len(),
        frontier_size,
        live_count: distinct - candidates.len(),
        collectible_count: result.len(),
    };

    (result, stats)
}

/// Ids of every transaction holding at least one unspent output, sorted.
pub fn find_frontier(snapshot: &[LedgerTransaction], index: &GraphIndex<'_>) -> Vec<TxId> {
    let mut frontier: Vec<TxId> = snapshot
        .iter()
        .filter(|tx| index.is_frontier(tx))
        .map(|tx| tx.id)
        .collect();
    frontier.sort_unstable();
    frontier.dedup();
    frontier
}

/// Remove everything connected to `roots` from `candidates`.
fn sweep<'a>(
    roots: Vec<&'a LedgerTransaction>,
    index: &GraphIndex<'a>,
    candidates: &mut HashSet<TxId>,
) {
    let mut stack = roots;

    while let Some(tx) = stack.pop() {
        // Already protected through another path
        if !candidates.remove(&tx.id) {
            continue;
        }

        for output in tx.outputs() {
            if let Some(consumer) = index.consumer(&output) {
                if candidates.contains(&consumer.id) {
                    stack.push(consumer);
                }
            }
        }

        // Producers outside the snapshot were pruned earlier; the walk stops there.
        for input in &tx.inputs {
            if let Some(producer) = index.producer(input) {
                if candidates.contains(&producer.id) {
                    stack.push(producer);
                }
            }
        }
    }
}

fn garbage_result(snapshot: &[LedgerTransaction], garbage: &HashSet<TxId>) -> CollectionResult {
    let mut transactions = Vec::with_capacity(garbage.len());
    let mut outputs: Vec<OutputRef> = Vec::new();

    for tx in snapshot.iter().filter(|tx| garbage.contains(&tx.id)) {
        transactions.push(tx.id);
        outputs.extend(tx.outputs());
    }

    transactions.sort_unstable();
    transactions.dedup();
    outputs.sort_unstable();
    outputs.dedup();

    CollectionResult::new(transactions, outputs)
}
