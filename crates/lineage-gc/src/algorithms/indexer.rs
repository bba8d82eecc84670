//! Graph Indexer
//!
//! Turns an unordered snapshot into the consumer/producer maps the
//! collector walks. O(V + E), no I/O.

use crate::domain::entities::GraphIndex;
use crate::domain::errors::GcError;
use shared_types::{LedgerTransaction, OutputRef, TxId};
use std::collections::{HashMap, HashSet};

/// Build the consumed-output and produced-output indexes for a snapshot.
///
/// Double consumption of one output is not resolved here: the later
/// consumer in snapshot order wins. Run [`validate_snapshot`] first when
/// the snapshot source is not trusted.
pub fn build_indexes(snapshot: &[LedgerTransaction]) -> GraphIndex<'_> {
    let input_total: usize = snapshot.iter().map(|tx| tx.inputs.len()).sum();
    let output_total: usize = snapshot.iter().map(|tx| tx.output_count as usize).sum();

    let mut index = GraphIndex {
        consumer_of: HashMap::with_capacity(input_total),
        producer_of: HashMap::with_capacity(output_total),
    };

    for tx in snapshot {
        for input in &tx.inputs {
            index.consumer_of.insert(*input, tx);
        }
        for output in tx.outputs() {
            index.producer_of.insert(output, tx);
        }
    }

    index
}

/// Reject snapshots that break the ledger's uniqueness invariants.
///
/// Checks that every transaction id appears once and that no output is
/// consumed by two transactions. Any index built over a snapshot failing
/// this check is meaningless.
pub fn validate_snapshot(snapshot: &[LedgerTransaction]) -> Result<(), GcError> {
    let mut seen: HashSet<TxId> = HashSet::with_capacity(snapshot.len());
    let mut consumers: HashMap<OutputRef, TxId> = HashMap::new();

    for tx in snapshot {
        if !seen.insert(tx.id) {
            return Err(GcError::DuplicateTransaction { tx_id: tx.id });
        }

        for input in &tx.inputs {
            if let Some(first) = consumers.insert(*input, tx.id) {
                return Err(GcError::DuplicateConsumption {
                    output: *input,
                    first,
                    second: tx.id,
                });
            }
        }
    }

    Ok(())
}
