//! # Core Ledger Entities
//!
//! A UTXO-style ledger: each transaction consumes output slots produced by
//! earlier transactions and produces fresh output slots of its own.
//!
//! - **Identity**: `TxId` (content hash), `OutputRef` (tx id + slot index)
//! - **Record**: `LedgerTransaction`

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::fmt;

// Re-export H256 so downstream crates share one hash type.
pub use primitive_types::H256;

/// A 32-byte hash.
pub type Hash = H256;

/// Domain separator for transaction content hashing.
pub const TX_HASH_DOMAIN: &[u8] = b"LEDGER_TX_V1";

/// Content hash identifying a transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TxId(pub Hash);

impl TxId {
    /// Build an id from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(H256(bytes))
    }

    /// Synthetic id with `value` in the low 8 bytes (big endian).
    pub fn from_low_u64_be(value: u64) -> Self {
        Self(H256::from_low_u64_be(value))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_fixed_bytes()
    }

    /// Output slot `index` of this transaction.
    pub fn output(self, index: u32) -> OutputRef {
        OutputRef::new(self, index)
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<Hash> for TxId {
    fn from(hash: Hash) -> Self {
        Self(hash)
    }
}

/// Address of one output slot of one transaction.
///
/// Ordered by `(tx_id, index)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputRef {
    /// Transaction that owns the slot.
    pub tx_id: TxId,
    /// Slot position within the producer's outputs.
    pub index: u32,
}

impl OutputRef {
    pub fn new(tx_id: TxId, index: u32) -> Self {
        Self { tx_id, index }
    }
}

impl fmt::Display for OutputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_id, self.index)
    }
}

/// An immutable ledger transaction.
///
/// A transaction with no inputs is a pure issuance; a transaction with no
/// outputs is a terminal spend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    /// Content hash of this transaction.
    pub id: TxId,
    /// Consumed output slots, in order.
    pub inputs: Vec<OutputRef>,
    /// Number of output slots this transaction produces.
    pub output_count: u32,
}

impl LedgerTransaction {
    /// Create a transaction and derive its id from its content.
    ///
    /// `payload` stands in for everything that is not graph structure
    /// (owners, amounts, contract state) so that structurally identical
    /// transactions still get distinct ids.
    pub fn new(inputs: Vec<OutputRef>, output_count: u32, payload: &[u8]) -> Self {
        let id = compute_tx_id(&inputs, output_count, payload);
        Self {
            id,
            inputs,
            output_count,
        }
    }

    /// Create a transaction with a caller-chosen id.
    pub fn with_id(id: TxId, inputs: Vec<OutputRef>, output_count: u32) -> Self {
        Self {
            id,
            inputs,
            output_count,
        }
    }

    /// Pure issuance: one or more fresh outputs, nothing consumed.
    pub fn issue(output_count: u32, payload: &[u8]) -> Self {
        Self::new(Vec::new(), output_count, payload)
    }

    /// Reference to output slot `index`, if it exists.
    pub fn output(&self, index: u32) -> Option<OutputRef> {
        (index < self.output_count).then(|| self.id.output(index))
    }

    /// All output slots produced by this transaction.
    pub fn outputs(&self) -> impl Iterator<Item = OutputRef> + '_ {
        (0..self.output_count).map(move |index| self.id.output(index))
    }

    pub fn is_issuance(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn is_terminal(&self) -> bool {
        self.output_count == 0
    }
}

/// SHA3-256 over the canonical transaction encoding.
///
/// Layout: domain || input_count || (tx_id || index)* || output_count ||
/// payload_len || payload, integers little-endian u32.
pub fn compute_tx_id(inputs: &[OutputRef], output_count: u32, payload: &[u8]) -> TxId {
    let mut hasher = Sha3_256::new();
    hasher.update(TX_HASH_DOMAIN);
    hasher.update((inputs.len() as u32).to_le_bytes());
    for input in inputs {
        hasher.update(input.tx_id.as_bytes());
        hasher.update(input.index.to_le_bytes());
    }
    hasher.update(output_count.to_le_bytes());
    hasher.update((payload.len() as u32).to_le_bytes());
    hasher.update(payload);
    TxId::from_bytes(hasher.finalize().into())
}
