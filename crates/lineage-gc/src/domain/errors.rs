//! Error types for Lineage GC

use shared_types::{OutputRef, TxId};
use thiserror::Error;

/// All errors that can occur during a garbage collection pass
#[derive(Debug, Error)]
pub enum GcError {
    /// The same transaction id appears twice in one snapshot
    #[error("Duplicate transaction in snapshot: {tx_id}")]
    DuplicateTransaction { tx_id: TxId },

    /// Ledger invariant violation: one output consumed by two transactions
    #[error("Output {output} consumed by both {first} and {second}")]
    DuplicateConsumption {
        output: OutputRef,
        first: TxId,
        second: TxId,
    },

    /// Snapshot exceeds configured limit
    #[error("Snapshot too large: {size} > {max}")]
    SnapshotTooLarge { size: usize, max: usize },

    /// Post-collection verification found a violated property
    #[error("Collection invariant violated: {0}")]
    InvariantViolation(String),

    /// Garbage collection is switched off in config
    #[error("Garbage collection is disabled")]
    Disabled,

    /// Snapshot provider failed
    #[error("Snapshot acquisition failed: {0}")]
    Snapshot(#[source] StoreError),

    /// Pending record or pruning storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Persisted record could not be decoded
    #[error("Record decode failed: {0}")]
    Codec(#[from] CodecError),

    /// `apply_pending_collection` found nothing to apply
    #[error("No pending collection record")]
    NoPendingCollection,
}

/// Storage collaborator errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Not found")]
    NotFound,
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Malformed collection record stream
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid record magic")]
    BadMagic,

    #[error("Unsupported record version: {0}")]
    UnsupportedVersion(u8),

    #[error("Truncated record: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("Element count {0} exceeds remaining record length")]
    LengthOverflow(u64),

    #[error("Checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("{0} trailing bytes after record")]
    TrailingBytes(usize),
}
