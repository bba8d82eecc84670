//! # Collection Record Codec
//!
//! Durable form of a [`CollectionResult`], written ahead of an
//! asynchronous physical-delete pass ("pending collection" record).
//!
//! ## Format
//!
//! ```text
//! [MAGIC 8][TXCOUNT u64][TXID 32]*[REFCOUNT u64]([TXID 32][INDEX u32])*[CRC32 u32]
//! ```
//!
//! Integers are little-endian. The CRC32 covers every preceding byte.
//! Decoding never returns a partial result: truncation, corruption and
//! trailing garbage are all errors.

use super::entities::CollectionResult;
use super::errors::CodecError;
use shared_types::{OutputRef, TxId};

/// Magic bytes; the final byte is the format version.
const RECORD_MAGIC: &[u8; 8] = b"QCLGC\x00\x00\x01";

/// Current format version.
pub const RECORD_VERSION: u8 = 1;

const MAGIC_LEN: usize = 8;
const COUNT_LEN: usize = 8;
const TX_ID_LEN: usize = 32;
const OUTPUT_REF_LEN: usize = TX_ID_LEN + 4;
const CHECKSUM_LEN: usize = 4;

/// Encoder/decoder for pending-collection records.
#[derive(Debug, Default, Clone, Copy)]
pub struct CollectionRecordCodec;

impl CollectionRecordCodec {
    pub fn new() -> Self {
        Self
    }

    /// Exact encoded size of `result`.
    pub fn encoded_len(result: &CollectionResult) -> usize {
        MAGIC_LEN
            + COUNT_LEN
            + result.collectible_transactions.len() * TX_ID_LEN
            + COUNT_LEN
            + result.collectible_outputs.len() * OUTPUT_REF_LEN
            + CHECKSUM_LEN
    }

    /// Serialize a collection result.
    pub fn encode(&self, result: &CollectionResult) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::encoded_len(result));

        buf.extend_from_slice(RECORD_MAGIC);

        buf.extend_from_slice(&(result.collectible_transactions.len() as u64).to_le_bytes());
        for tx_id in &result.collectible_transactions {
            buf.extend_from_slice(tx_id.as_bytes());
        }

        buf.extend_from_slice(&(result.collectible_outputs.len() as u64).to_le_bytes());
        for output in &result.collectible_outputs {
            buf.extend_from_slice(output.tx_id.as_bytes());
            buf.extend_from_slice(&output.index.to_le_bytes());
        }

        let checksum = crc32fast::hash(&buf);
        buf.extend_from_slice(&checksum.to_le_bytes());

        buf
    }

    /// Restore a collection result.
    pub fn decode(&self, data: &[u8]) -> Result<CollectionResult, CodecError> {
        let mut reader = RecordReader::new(data);

        let magic = reader.take(MAGIC_LEN)?;
        if magic[..7] != RECORD_MAGIC[..7] {
            return Err(CodecError::BadMagic);
        }
        if magic[7] != RECORD_VERSION {
            return Err(CodecError::UnsupportedVersion(magic[7]));
        }

        let tx_count = reader.count(TX_ID_LEN)?;
        let mut transactions = Vec::with_capacity(tx_count);
        for _ in 0..tx_count {
            transactions.push(reader.tx_id()?);
        }

        let ref_count = reader.count(OUTPUT_REF_LEN)?;
        let mut outputs = Vec::with_capacity(ref_count);
        for _ in 0..ref_count {
            let tx_id = reader.tx_id()?;
            let index = reader.u32()?;
            outputs.push(OutputRef::new(tx_id, index));
        }

        let body_len = reader.position();
        let expected = reader.u32()?;
        let actual = crc32fast::hash(&data[..body_len]);
        if expected != actual {
            return Err(CodecError::ChecksumMismatch { expected, actual });
        }

        if reader.remaining() > 0 {
            return Err(CodecError::TrailingBytes(reader.remaining()));
        }

        Ok(CollectionResult::new(transactions, outputs))
    }
}

/// Bounds-checked cursor over a record.
struct RecordReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> RecordReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < len {
            return Err(CodecError::Truncated {
                needed: len,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn u32(&mut self) -> Result<u32, CodecError> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(bytes))
    }

    fn u64(&mut self) -> Result<u64, CodecError> {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(bytes))
    }

    fn tx_id(&mut self) -> Result<TxId, CodecError> {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(self.take(TX_ID_LEN)?);
        Ok(TxId::from_bytes(bytes))
    }

    /// Element count, rejected up front if the elements cannot fit.
    fn count(&mut self, element_len: usize) -> Result<usize, CodecError> {
        let count = self.u64()?;
        let fits = usize::try_from(count)
            .ok()
            .and_then(|n| n.checked_mul(element_len))
            .map(|bytes| bytes <= self.remaining())
            .unwrap_or(false);
        if !fits {
            return Err(CodecError::LengthOverflow(count));
        }
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_id(val: u64) -> TxId {
        TxId::from_low_u64_be(val)
    }

    fn sample() -> CollectionResult {
        CollectionResult::new(
            vec![make_id(3), make_id(1), make_id(2)],
            vec![make_id(1).output(0), make_id(1).output(7), make_id(3).output(2)],
        )
    }

    #[test]
    fn test_roundtrip_preserves_order() {
        let codec = CollectionRecordCodec::new();
        let result = sample();

        let bytes = codec.encode(&result);
        assert_eq!(bytes.len(), CollectionRecordCodec::encoded_len(&result));
        assert_eq!(codec.decode(&bytes).unwrap(), result);
    }

    #[test]
    fn test_decoded_unsorted_record_answers_membership() {
        let codec = CollectionRecordCodec::new();
        let result = CollectionResult::new(vec![make_id(3), make_id(1), make_id(2)], vec![]);

        let decoded = codec.decode(&codec.encode(&result)).unwrap();
        assert_eq!(decoded.collectible_transactions, vec![make_id(3), make_id(1), make_id(2)]);
        for val in 1..=3 {
            assert!(decoded.contains(&make_id(val)), "id {val} missing");
        }
        assert!(!decoded.contains(&make_id(4)));
    }

    #[test]
    fn test_roundtrip_empty() {
        let codec = CollectionRecordCodec::new();
        let bytes = codec.encode(&CollectionResult::empty());

        assert_eq!(bytes.len(), 8 + 8 + 8 + 4);
        assert_eq!(codec.decode(&bytes).unwrap(), CollectionResult::empty());
    }

    #[test]
    fn test_rejects_bad_magic() {
        let codec = CollectionRecordCodec::new();
        let mut bytes = codec.encode(&sample());
        bytes[0] = b'X';

        assert_eq!(codec.decode(&bytes), Err(CodecError::BadMagic));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let codec = CollectionRecordCodec::new();
        let mut bytes = codec.encode(&sample());
        bytes[7] = 9;

        assert_eq!(codec.decode(&bytes), Err(CodecError::UnsupportedVersion(9)));
    }

    #[test]
    fn test_rejects_every_truncation() {
        let codec = CollectionRecordCodec::new();
        let bytes = codec.encode(&sample());

        for len in 0..bytes.len() {
            assert!(
                codec.decode(&bytes[..len]).is_err(),
                "prefix of {len} bytes decoded"
            );
        }
    }

    #[test]
    fn test_rejects_corrupted_hash() {
        let codec = CollectionRecordCodec::new();
        let mut bytes = codec.encode(&sample());
        // Inside the first transaction id
        bytes[20] ^= 0xff;

        assert!(matches!(
            codec.decode(&bytes),
            Err(CodecError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_trailing_bytes() {
        let codec = CollectionRecordCodec::new();
        let mut bytes = codec.encode(&sample());
        bytes.extend_from_slice(&[0, 0]);

        assert_eq!(codec.decode(&bytes), Err(CodecError::TrailingBytes(2)));
    }

    #[test]
    fn test_rejects_oversized_count() {
        let codec = CollectionRecordCodec::new();
        let mut bytes = codec.encode(&CollectionResult::empty());
        bytes[8..16].copy_from_slice(&u64::MAX.to_le_bytes());

        assert_eq!(codec.decode(&bytes), Err(CodecError::LengthOverflow(u64::MAX)));
    }
}
