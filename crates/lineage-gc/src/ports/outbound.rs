//! Outbound Ports (Driven Ports / SPI)

use crate::domain::errors::StoreError;
use async_trait::async_trait;
use shared_types::{LedgerTransaction, TxId};

/// Source of ledger snapshots
///
/// Must hand out an isolated, internally consistent view: transactions
/// appended while a pass runs are not visible to that pass.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Every transaction currently known locally.
    async fn snapshot(&self) -> Result<Vec<LedgerTransaction>, StoreError>;
}

/// Physical deletion of transactions from local storage
#[async_trait]
pub trait TransactionPruner: Send + Sync {
    /// Delete the named transactions, returning how many existed.
    ///
    /// Ids that are already gone are skipped.
    async fn delete_transactions(&self, ids: &[TxId]) -> Result<usize, StoreError>;
}

/// Durable slot for the pending-collection record
#[async_trait]
pub trait CollectionRecordStore: Send + Sync {
    /// Replace the pending record with `record`.
    async fn put_record(&self, record: Vec<u8>) -> Result<(), StoreError>;

    /// Current pending record, if any.
    async fn load_record(&self) -> Result<Option<Vec<u8>>, StoreError>;

    /// Remove the pending record.
    async fn clear_record(&self) -> Result<(), StoreError>;
}
