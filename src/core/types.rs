use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto;

/// A 32-byte hash used throughout the system.
///
/// Stored in internal (little-endian) order; the human-readable hex form is
/// byte-reversed, as on every Bitcoin-derived chain.
pub type Hash256 = [u8; 32];

/// Null hash (all zeros) used for the genesis block's prev_hash
pub const NULL_HASH: Hash256 = [0u8; 32];

/// Parse a display-order (big-endian) hex string into an internal-order hash.
pub fn hash256_from_hex(s: &str) -> Result<Hash256, hex::FromHexError> {
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(s, &mut bytes)?;
    bytes.reverse();
    Ok(bytes)
}

/// Render an internal-order hash in the conventional display order.
pub fn hash256_to_hex(hash: &Hash256) -> String {
    let mut bytes = *hash;
    bytes.reverse();
    hex::encode(bytes)
}

// ─── Canonical Encoding ──────────────────────────────────────────────
//
// Consensus identities (txid, merkle root, block hash) are computed over an
// explicit, stable byte encoding: little-endian integers and Bitcoin-style
// compact sizes. Nothing serde-derived ever feeds a consensus hash.

/// Append a Bitcoin-style compact size.
pub fn write_compact_size(buf: &mut Vec<u8>, n: u64) {
    match n {
        0..=0xfc => buf.push(n as u8),
        0xfd..=0xffff => {
            buf.push(0xfd);
            buf.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            buf.push(0xfe);
            buf.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            buf.push(0xff);
            buf.extend_from_slice(&n.to_le_bytes());
        }
    }
}

fn write_var_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    write_compact_size(buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

// ─── Transaction Types ───────────────────────────────────────────────

/// Reference to a previous transaction output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct OutPoint {
    pub txid: Hash256,
    pub vout: u32,
}

impl OutPoint {
    /// The null outpoint that marks a coinbase input.
    pub fn null() -> Self {
        OutPoint { txid: NULL_HASH, vout: 0xFFFFFFFF }
    }
}

/// Transaction input - spends a previous output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxInput {
    pub previous_output: OutPoint,
    pub script_sig: Vec<u8>,
    pub sequence: u32,
}

/// Transaction output - creates a new spendable output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxOutput {
    pub value: u64,
    pub script_pubkey: Vec<u8>,
}

/// A complete transaction.
///
/// `comment` is a free-form blob the chain has carried in its transaction
/// format since launch. It participates in the canonical encoding (and
/// therefore in the txid), so it can never be dropped without changing
/// every pinned identity, starting with the genesis merkle root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub lock_time: u32,
    pub comment: Vec<u8>,
}

impl Transaction {
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].previous_output == OutPoint::null()
    }

    pub fn total_output(&self) -> u64 {
        self.outputs.iter().map(|o| o.value).sum()
    }

    /// Canonical consensus encoding.
    pub fn consensus_encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.size_hint());
        buf.extend_from_slice(&self.version.to_le_bytes());
        write_compact_size(&mut buf, self.inputs.len() as u64);
        for input in &self.inputs {
            buf.extend_from_slice(&input.previous_output.txid);
            buf.extend_from_slice(&input.previous_output.vout.to_le_bytes());
            write_var_bytes(&mut buf, &input.script_sig);
            buf.extend_from_slice(&input.sequence.to_le_bytes());
        }
        write_compact_size(&mut buf, self.outputs.len() as u64);
        for output in &self.outputs {
            buf.extend_from_slice(&output.value.to_le_bytes());
            write_var_bytes(&mut buf, &output.script_pubkey);
        }
        buf.extend_from_slice(&self.lock_time.to_le_bytes());
        write_var_bytes(&mut buf, &self.comment);
        buf
    }

    /// Compute the transaction hash.
    ///
    /// Single SHA-256 over the canonical encoding. The chain launched with
    /// this identity and the pinned genesis merkle root freezes it.
    pub fn hash(&self) -> Hash256 {
        crypto::sha256(&self.consensus_encode())
    }

    fn size_hint(&self) -> usize {
        let ins: usize = self.inputs.iter().map(|i| 41 + i.script_sig.len()).sum();
        let outs: usize = self.outputs.iter().map(|o| 9 + o.script_pubkey.len()).sum();
        16 + ins + outs + self.comment.len()
    }
}

// ─── Block Types ─────────────────────────────────────────────────────

/// Block header. Encodes to exactly 80 bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockHeader {
    pub version: u32,
    pub prev_hash: Hash256,
    pub merkle_root: Hash256,
    /// Unix timestamp (seconds)
    pub timestamp: u32,
    /// Compact difficulty target ("nBits")
    pub bits: u32,
    pub nonce: u32,
}

/// Size of an encoded block header.
pub const HEADER_SIZE: usize = 80;

impl BlockHeader {
    /// Canonical 80-byte header encoding.
    pub fn consensus_encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_SIZE);
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.extend_from_slice(&self.prev_hash);
        buf.extend_from_slice(&self.merkle_root);
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        buf.extend_from_slice(&self.bits.to_le_bytes());
        buf.extend_from_slice(&self.nonce.to_le_bytes());
        buf
    }

    /// Compute the block hash (double SHA-256 of the encoded header).
    pub fn hash(&self) -> Hash256 {
        crypto::double_sha256(&self.consensus_encode())
    }
}

impl fmt::Display for BlockHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block [{}] bits={:08x} ts={} nonce={}",
            hash256_to_hex(&self.hash()),
            self.bits,
            self.timestamp,
            self.nonce,
        )
    }
}

/// A complete block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Compute the merkle root from the block's transactions.
    ///
    /// Leaves are txids; an odd level duplicates its last entry; interior
    /// nodes are double SHA-256 of the concatenated children.
    pub fn compute_merkle_root(&self) -> Hash256 {
        if self.transactions.is_empty() {
            return NULL_HASH;
        }

        let mut hashes: Vec<Hash256> = self.transactions.iter().map(|tx| tx.hash()).collect();

        while hashes.len() > 1 {
            if hashes.len() % 2 != 0 {
                let last = *hashes.last().expect("level is non-empty");
                hashes.push(last);
            }

            let mut next_level = Vec::with_capacity(hashes.len() / 2);
            for chunk in hashes.chunks(2) {
                let mut combined = [0u8; 64];
                combined[..32].copy_from_slice(&chunk[0]);
                combined[32..].copy_from_slice(&chunk[1]);
                next_level.push(crypto::double_sha256(&combined));
            }
            hashes = next_level;
        }

        hashes[0]
    }

    pub fn validate_merkle_root(&self) -> bool {
        self.header.merkle_root == self.compute_merkle_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_tx(tag: u8) -> Transaction {
        Transaction {
            version: 1,
            inputs: vec![TxInput {
                previous_output: OutPoint::null(),
                script_sig: vec![tag],
                sequence: 0xFFFFFFFF,
            }],
            outputs: vec![TxOutput { value: 0, script_pubkey: vec![0xac] }],
            lock_time: 0,
            comment: Vec::new(),
        }
    }

    #[test]
    fn test_header_encodes_to_80_bytes() {
        let header = BlockHeader {
            version: 1,
            prev_hash: NULL_HASH,
            merkle_root: NULL_HASH,
            timestamp: 0,
            bits: 0x1e0ffff0,
            nonce: 0,
        };
        assert_eq!(header.consensus_encode().len(), HEADER_SIZE);
    }

    #[test]
    fn test_tx_hash_deterministic() {
        let tx = dummy_tx(1);
        assert_eq!(tx.hash(), tx.hash());
        assert_ne!(tx.hash(), dummy_tx(2).hash());
    }

    #[test]
    fn test_coinbase_detection() {
        assert!(dummy_tx(1).is_coinbase());
        let mut tx = dummy_tx(1);
        tx.inputs[0].previous_output.vout = 0;
        assert!(!tx.is_coinbase());
    }

    #[test]
    fn test_merkle_root_single_tx_is_txid() {
        let tx = dummy_tx(1);
        let block = Block {
            header: BlockHeader {
                version: 1,
                prev_hash: NULL_HASH,
                merkle_root: NULL_HASH,
                timestamp: 0,
                bits: 0,
                nonce: 0,
            },
            transactions: vec![tx.clone()],
        };
        assert_eq!(block.compute_merkle_root(), tx.hash());
    }

    #[test]
    fn test_merkle_root_odd_level_duplicates_last() {
        let txs = vec![dummy_tx(1), dummy_tx(2), dummy_tx(3)];
        let padded = vec![dummy_tx(1), dummy_tx(2), dummy_tx(3), dummy_tx(3)];
        let header = BlockHeader {
            version: 1,
            prev_hash: NULL_HASH,
            merkle_root: NULL_HASH,
            timestamp: 0,
            bits: 0,
            nonce: 0,
        };
        let a = Block { header: header.clone(), transactions: txs };
        let b = Block { header, transactions: padded };
        assert_eq!(a.compute_merkle_root(), b.compute_merkle_root());
    }

    #[test]
    fn test_hash_hex_round_trip() {
        let display = "00000ce74dc5a0f433fd0c65a9bd769c6e463ddaace8826702620246e3ab4c38";
        let hash = hash256_from_hex(display).unwrap();
        // internal order is reversed: leading display zeros end up last
        assert_eq!(hash[31], 0x00);
        assert_eq!(hash[0], 0x38);
        assert_eq!(hash256_to_hex(&hash), display);
    }

    #[test]
    fn test_compact_size_boundaries() {
        let mut buf = Vec::new();
        write_compact_size(&mut buf, 0xfc);
        assert_eq!(buf, [0xfc]);
        buf.clear();
        write_compact_size(&mut buf, 0xfd);
        assert_eq!(buf, [0xfd, 0xfd, 0x00]);
        buf.clear();
        write_compact_size(&mut buf, 0x1_0000);
        assert_eq!(buf, [0xfe, 0x00, 0x00, 0x01, 0x00]);
    }
}
