//! In-memory ledger adapter
//!
//! Implements `SnapshotProvider` and `TransactionPruner` over a locked map.
//! Snapshots are cloned under the read lock, so appends made while a pass
//! runs never reach that pass.

use crate::domain::errors::StoreError;
use crate::ports::outbound::{SnapshotProvider, TransactionPruner};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{LedgerTransaction, TxId};
use std::collections::HashMap;
use tracing::debug;

/// Append-only (until pruned) transaction store held in memory.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    transactions: RwLock<HashMap<TxId, LedgerTransaction>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a ledger from existing transactions.
    pub fn with_transactions(transactions: impl IntoIterator<Item = LedgerTransaction>) -> Self {
        let ledger = Self::new();
        for tx in transactions {
            ledger.append(tx);
        }
        ledger
    }

    /// Record a transaction. Returns false if its id is already stored.
    pub fn append(&self, tx: LedgerTransaction) -> bool {
        let mut transactions = self.transactions.write();
        if transactions.contains_key(&tx.id) {
            return false;
        }
        transactions.insert(tx.id, tx);
        true
    }

    pub fn contains(&self, id: &TxId) -> bool {
        self.transactions.read().contains_key(id)
    }

    pub fn get(&self, id: &TxId) -> Option<LedgerTransaction> {
        self.transactions.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.transactions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.read().is_empty()
    }
}

#[async_trait]
impl SnapshotProvider for InMemoryLedger {
    async fn snapshot(&self) -> Result<Vec<LedgerTransaction>, StoreError> {
        let snapshot: Vec<LedgerTransaction> = self.transactions.read().values().cloned().collect();
        debug!(size = snapshot.len(), "[lineage-gc] Snapshot taken from memory ledger");
        Ok(snapshot)
    }
}

#[async_trait]
impl TransactionPruner for InMemoryLedger {
    async fn delete_transactions(&self, ids: &[TxId]) -> Result<usize, StoreError> {
        let mut transactions = self.transactions.write();
        let deleted = ids
            .iter()
            .filter(|id| transactions.remove(*id).is_some())
            .count();
        debug!(
            requested = ids.len(),
            deleted, "[lineage-gc] Pruned transactions from memory ledger"
        );
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_is_isolated_from_later_appends() {
        let ledger = InMemoryLedger::new();
        let first = LedgerTransaction::issue(1, b"first");
        ledger.append(first.clone());

        let snapshot = ledger.snapshot().await.unwrap();
        ledger.append(LedgerTransaction::issue(1, b"second"));

        assert_eq!(snapshot, vec![first]);
        assert_eq!(ledger.len(), 2);
    }

    #[tokio::test]
    async fn test_append_rejects_duplicate_id() {
        let ledger = InMemoryLedger::new();
        let tx = LedgerTransaction::issue(1, b"x");

        assert!(ledger.append(tx.clone()));
        assert!(!ledger.append(tx));
        assert_eq!(ledger.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_counts_only_existing() {
        let a = LedgerTransaction::issue(1, b"a");
        let b = LedgerTransaction::issue(1, b"b");
        let ledger = InMemoryLedger::with_transactions(vec![a.clone(), b.clone()]);

        let deleted = ledger
            .delete_transactions(&[a.id, TxId::from_low_u64_be(99)])
            .await
            .unwrap();

        assert_eq!(deleted, 1);
        assert!(!ledger.contains(&a.id));
        assert_eq!(ledger.get(&b.id), Some(b));
    }
}
