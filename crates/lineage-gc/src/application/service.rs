//! Lineage GC Service
//!
//! Main service implementing LedgerGcApi.

use crate::algorithms::{build_indexes, collect_with_stats, validate_snapshot};
use crate::config::GcConfig;
use crate::domain::entities::{CollectionResult, CollectionStats, GcReport};
use crate::domain::errors::GcError;
use crate::domain::invariants::verify_collection;
use crate::domain::persistence::CollectionRecordCodec;
use crate::ports::inbound::LedgerGcApi;
use crate::ports::outbound::{CollectionRecordStore, SnapshotProvider, TransactionPruner};
use async_trait::async_trait;
use shared_types::LedgerTransaction;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

/// Lineage GC Service
///
/// Orchestrates one pass:
/// 1. Acquire an isolated snapshot
/// 2. Check snapshot integrity
/// 3. Index and collect
/// 4. Optionally verify the result
/// 5. Persist and/or prune
pub struct LedgerGcService {
    config: GcConfig,
    snapshots: Arc<dyn SnapshotProvider>,
    pruner: Arc<dyn TransactionPruner>,
    records: Arc<dyn CollectionRecordStore>,
    codec: CollectionRecordCodec,
}

impl LedgerGcService {
    /// Create a new service with default config
    pub fn new(
        snapshots: Arc<dyn SnapshotProvider>,
        pruner: Arc<dyn TransactionPruner>,
        records: Arc<dyn CollectionRecordStore>,
    ) -> Self {
        Self::with_config(GcConfig::default(), snapshots, pruner, records)
    }

    /// Create a new service with custom config
    pub fn with_config(
        config: GcConfig,
        snapshots: Arc<dyn SnapshotProvider>,
        pruner: Arc<dyn TransactionPruner>,
        records: Arc<dyn CollectionRecordStore>,
    ) -> Self {
        Self {
            config,
            snapshots,
            pruner,
            records,
            codec: CollectionRecordCodec::new(),
        }
    }

    pub fn config(&self) -> &GcConfig {
        &self.config
    }

    /// Run the collector over an already materialized snapshot.
    ///
    /// Synchronous and free of I/O.
    pub fn analyze(
        &self,
        snapshot: &[LedgerTransaction],
    ) -> Result<(CollectionResult, CollectionStats), GcError> {
        if self.config.verify_integrity {
            validate_snapshot(snapshot).map_err(|err| {
                warn!(error = %err, "[lineage-gc] Snapshot failed integrity check");
                err
            })?;
        }

        let index = build_indexes(snapshot);
        debug!(
            consumed = index.consumed_count(),
            produced = index.produced_count(),
            "[lineage-gc] Indexes built"
        );

        let (result, stats) = collect_with_stats(snapshot, &index);

        if self.config.verify_result {
            verify_collection(snapshot, &index, &result).map_err(|err| {
                error!(error = %err, "[lineage-gc] Collection failed verification");
                err
            })?;
        }

        let result = if self.config.include_output_refs {
            result
        } else {
            result.without_outputs()
        };

        Ok((result, stats))
    }

    async fn take_snapshot(&self) -> Result<Vec<LedgerTransaction>, GcError> {
        if !self.config.enabled {
            return Err(GcError::Disabled);
        }

        let snapshot = self
            .snapshots
            .snapshot()
            .await
            .map_err(GcError::Snapshot)?;

        if snapshot.len() > self.config.max_snapshot_size {
            return Err(GcError::SnapshotTooLarge {
                size: snapshot.len(),
                max: self.config.max_snapshot_size,
            });
        }

        Ok(snapshot)
    }

    async fn persist(&self, result: &CollectionResult) -> Result<(), GcError> {
        let record = self.codec.encode(result);
        debug!(bytes = record.len(), "[lineage-gc] Persisting pending collection");
        self.records.put_record(record).await?;
        Ok(())
    }

    async fn prune(&self, result: &CollectionResult) -> Result<usize, GcError> {
        if result.is_empty() {
            return Ok(0);
        }
        let deleted = self
            .pruner
            .delete_transactions(&result.collectible_transactions)
            .await?;
        info!(
            requested = result.len(),
            deleted, "[lineage-gc] Collectible transactions deleted"
        );
        Ok(deleted)
    }
}

#[async_trait]
impl LedgerGcApi for LedgerGcService {
    async fn collect_garbage(&self) -> Result<GcReport, GcError> {
        let snapshot = self.take_snapshot().await?;

        info!(
            snapshot_size = snapshot.len(),
            "[lineage-gc] Collecting garbage"
        );

        let (result, stats) = self.analyze(&snapshot)?;

        info!(
            frontier = stats.frontier_size,
            live = stats.live_count,
            collectible = stats.collectible_count,
            "[lineage-gc] Collection complete"
        );

        Ok(GcReport {
            stats,
            result,
            deleted_count: 0,
        })
    }

    async fn schedule_collection(&self) -> Result<GcReport, GcError> {
        let report = self.collect_garbage().await?;
        self.persist(&report.result).await?;
        Ok(report)
    }

    /// A stale record is still safe to apply: collectible transactions own
    /// no unspent output, so nothing appended later can connect to them.
    async fn apply_pending_collection(&self) -> Result<(CollectionResult, usize), GcError> {
        let record = self
            .records
            .load_record()
            .await?
            .ok_or(GcError::NoPendingCollection)?;

        let result = self.codec.decode(&record).map_err(|err| {
            error!(error = %err, "[lineage-gc] Pending collection record is corrupt");
            err
        })?;

        let deleted = self.prune(&result).await?;
        self.records.clear_record().await?;

        Ok((result, deleted))
    }

    async fn run_full_cycle(&self) -> Result<GcReport, GcError> {
        let mut report = self.schedule_collection().await?;
        report.deleted_count = self.prune(&report.result).await?;
        self.records.clear_record().await?;
        Ok(report)
    }
}
