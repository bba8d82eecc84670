//! Inbound Ports (Driving Ports / API)

use crate::domain::entities::{CollectionResult, GcReport};
use crate::domain::errors::GcError;
use async_trait::async_trait;

/// Primary Lineage GC API
#[async_trait]
pub trait LedgerGcApi: Send + Sync {
    /// Take a snapshot and compute its collectible set.
    ///
    /// Nothing is deleted or persisted.
    async fn collect_garbage(&self) -> Result<GcReport, GcError>;

    /// Compute the collectible set and persist it as a pending record
    /// for a later delete pass.
    async fn schedule_collection(&self) -> Result<GcReport, GcError>;

    /// Physically delete the transactions named by the pending record,
    /// then clear the record.
    ///
    /// Returns the applied record and the number of deleted transactions.
    async fn apply_pending_collection(&self) -> Result<(CollectionResult, usize), GcError>;

    /// Collect, persist, delete and clear in one pass.
    async fn run_full_cycle(&self) -> Result<GcReport, GcError>;
}
