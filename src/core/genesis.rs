//! Genesis block construction and certification for VKCoin.
//!
//! Every network variant shares one canonical coinbase (the launch
//! headline pushed into the signature script, a zero-value CHECKSIG output
//! to the launch pubkey) and differs only in header fields. For networks
//! whose identity is pinned, [`checked_genesis`] recomputes the merkle
//! root and block hash and refuses to start on any disagreement: that is a
//! defect in the binary, not a chain condition.
//!
//! [`mine_genesis`] is the nonce search used once, offline, when minting a
//! new network. It is unbounded and CPU-bound and is reachable only from
//! the `mine-genesis` developer binary — never from any library path.

use num_bigint::BigUint;

use crate::core::params::Network;
use crate::core::script::{ScriptBuilder, OP_CHECKSIG};
use crate::core::types::{hash256_from_hex, hash256_to_hex, Block, BlockHeader, Hash256, OutPoint, Transaction, TxInput, TxOutput, NULL_HASH};
use crate::pow;

/// Headline embedded in the genesis coinbase.
pub const GENESIS_TIMESTAMP_MESSAGE: &str =
    "John McAfee found dead in Spanish prison after his extradition to the US was approved - 6-24-21";

/// Uncompressed pubkey paid (zero value) by the genesis coinbase.
const GENESIS_OUTPUT_PUBKEY: &str =
    "04c14b8bf5aa978df3a232550f9c55409fa41d9227e76708700ec8a4f95ad0f3406753e6987635caa3b1d2cf7db6aa3974552ae7c2c7c46eec8fa074e92d1c5d3c";

/// Comment blob carried by the genesis transaction.
const GENESIS_COMMENT: &[u8] = b"Genesis Tx";

/// The compact-target constant every Bitcoin-descended chain pushes first
/// in its genesis signature script (0x1d00ffff).
const GENESIS_SCRIPT_DIFFICULTY: i64 = 486_604_799;

const GENESIS_VERSION: u32 = 1;

/// Merkle root shared by every variant (one coinbase, same bytes).
pub const GENESIS_MERKLE_ROOT_HEX: &str =
    "028ac648409cf605e7292626de0fea0765e8a02e213f45c824c582b764d43208";

/// Main network genesis block hash.
pub const MAIN_GENESIS_HASH_HEX: &str =
    "4b0b3fde78d9cad5ddddfdddbfae8a747d86f3d8d16e38eff3325342ec12a0ca";

/// Testnet genesis block hash.
pub const TESTNET_GENESIS_HASH_HEX: &str =
    "97e936d497a69db959093565dd53ab0854658b856546e7bb71d4ad57b3694a17";

/// Regtest genesis block hash.
pub const REGTEST_GENESIS_HASH_HEX: &str =
    "7f36421db8c3e9993932d500f4f011b7d2f3f32c0c51e30fac66a5ad546269e0";

/// Per-variant genesis header inputs.
#[derive(Debug, Clone, Copy)]
pub struct GenesisInputs {
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
}

/// Header inputs for each network variant.
pub fn genesis_inputs(network: Network) -> GenesisInputs {
    match network {
        // 2018-11-06T00:00:00+00:00
        Network::Main | Network::UnitTest => {
            GenesisInputs { timestamp: 1_541_462_400, bits: 0x1e0f_fff0, nonce: 1_165_698 }
        }
        // Later start so the timestamp is valid for a fresh test chain.
        Network::Testnet => GenesisInputs { timestamp: 1_546_300_800, bits: 0x1e0f_fff0, nonce: 0 },
        Network::Regtest => GenesisInputs { timestamp: 1_541_462_422, bits: 0x207f_ffff, nonce: 1 },
    }
}

/// The pinned block hash for `network`.
pub fn expected_genesis_hash(network: Network) -> Hash256 {
    let hex = match network {
        Network::Main | Network::UnitTest => MAIN_GENESIS_HASH_HEX,
        Network::Testnet => TESTNET_GENESIS_HASH_HEX,
        Network::Regtest => REGTEST_GENESIS_HASH_HEX,
    };
    hash256_from_hex(hex).expect("compiled-in genesis hash is valid hex")
}

/// The pinned merkle root (identical for every variant).
pub fn expected_merkle_root() -> Hash256 {
    hash256_from_hex(GENESIS_MERKLE_ROOT_HEX).expect("compiled-in merkle root is valid hex")
}

/// Build the canonical genesis coinbase for `message`.
pub fn genesis_coinbase(message: &str) -> Transaction {
    let script_sig = ScriptBuilder::new()
        .push_number(GENESIS_SCRIPT_DIFFICULTY)
        .push_number(4)
        .push_data(message.as_bytes())
        .into_bytes();

    let pubkey = hex::decode(GENESIS_OUTPUT_PUBKEY).expect("compiled-in pubkey is valid hex");
    let script_pubkey = ScriptBuilder::new()
        .push_data(&pubkey)
        .push_opcode(OP_CHECKSIG)
        .into_bytes();

    Transaction {
        version: 1,
        inputs: vec![TxInput {
            previous_output: OutPoint::null(),
            script_sig,
            sequence: 0xFFFFFFFF,
        }],
        outputs: vec![TxOutput { value: 0, script_pubkey }],
        lock_time: 0,
        comment: GENESIS_COMMENT.to_vec(),
    }
}

/// Assemble a genesis block from a coinbase message and header inputs.
pub fn genesis_block(message: &str, inputs: GenesisInputs) -> Block {
    let coinbase = genesis_coinbase(message);
    let mut block = Block {
        header: BlockHeader {
            version: GENESIS_VERSION,
            prev_hash: NULL_HASH,
            merkle_root: NULL_HASH,
            timestamp: inputs.timestamp,
            bits: inputs.bits,
            nonce: inputs.nonce,
        },
        transactions: vec![coinbase],
    };
    block.header.merkle_root = block.compute_merkle_root();
    block
}

/// Build the genesis block for `network` and certify its identity.
///
/// Recomputes the merkle root and block hash from scratch and compares
/// them against the pinned constants. A mismatch means this binary was
/// built with corrupted constants or a broken encoder and must not join
/// the network: it aborts.
pub fn checked_genesis(network: Network) -> Block {
    let block = genesis_block(GENESIS_TIMESTAMP_MESSAGE, genesis_inputs(network));

    let merkle = block.compute_merkle_root();
    assert!(
        merkle == block.header.merkle_root && merkle == expected_merkle_root(),
        "genesis merkle root mismatch on {}: computed {}",
        network,
        hash256_to_hex(&merkle),
    );

    let hash = block.header.hash();
    assert!(
        hash == expected_genesis_hash(network),
        "genesis block hash mismatch on {}: computed {}",
        network,
        hash256_to_hex(&hash),
    );

    tracing::debug!(
        "genesis certified for {}: hash={} merkle={}",
        network,
        hash256_to_hex(&hash),
        hash256_to_hex(&merkle),
    );
    block
}

/// Search for a nonce that satisfies `target`, for minting a new network.
///
/// Increments the nonce until the block hash falls at or below the target;
/// when the nonce wraps, bumps the timestamp and keeps going. Unbounded by
/// design — run it from the `mine-genesis` binary, nowhere else.
pub fn mine_genesis(mut block: Block, target: &BigUint) -> Block {
    tracing::info!("searching for genesis block...");
    loop {
        let hash = block.header.hash();
        if pow::hash_meets_target(&hash, target) {
            tracing::info!(
                "genesis found: time={} nonce={} hash={} merkle={}",
                block.header.timestamp,
                block.header.nonce,
                hash256_to_hex(&hash),
                hash256_to_hex(&block.header.merkle_root),
            );
            return block;
        }

        if block.header.nonce & 0xFFF == 0 {
            tracing::debug!("nonce {}: hash = {}", block.header.nonce, hash256_to_hex(&hash));
        }

        block.header.nonce = block.header.nonce.wrapping_add(1);
        if block.header.nonce == 0 {
            tracing::info!("nonce wrapped, incrementing time");
            block.header.timestamp += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_genesis_round_trip() {
        let block = genesis_block(GENESIS_TIMESTAMP_MESSAGE, genesis_inputs(Network::Main));
        assert_eq!(
            hash256_to_hex(&block.compute_merkle_root()),
            GENESIS_MERKLE_ROOT_HEX,
        );
        assert_eq!(hash256_to_hex(&block.header.hash()), MAIN_GENESIS_HASH_HEX);
    }

    #[test]
    fn test_checked_genesis_accepts_all_pinned_networks() {
        for network in [Network::Main, Network::Testnet, Network::Regtest, Network::UnitTest] {
            let block = checked_genesis(network);
            assert!(block.transactions[0].is_coinbase());
            assert_eq!(block.header.prev_hash, NULL_HASH);
            assert!(block.validate_merkle_root());
        }
    }

    #[test]
    fn test_genesis_is_deterministic() {
        let a = checked_genesis(Network::Main);
        let b = checked_genesis(Network::Main);
        assert_eq!(a, b);
    }

    #[test]
    fn test_message_mutation_changes_identity() {
        let inputs = genesis_inputs(Network::Main);
        let canonical = genesis_block(GENESIS_TIMESTAMP_MESSAGE, inputs);
        let mut altered_message = GENESIS_TIMESTAMP_MESSAGE.to_string();
        altered_message.replace_range(0..1, "K");
        let altered = genesis_block(&altered_message, inputs);
        assert_ne!(altered.header.merkle_root, canonical.header.merkle_root);
        assert_ne!(altered.header.hash(), canonical.header.hash());
    }

    #[test]
    fn test_coinbase_script_layout() {
        let tx = genesis_coinbase(GENESIS_TIMESTAMP_MESSAGE);
        let script = &tx.inputs[0].script_sig;
        // [04 ff ff 00 1d] [01 04] [4c 5f <95-byte message>]
        assert_eq!(&script[..5], &[0x04, 0xff, 0xff, 0x00, 0x1d]);
        assert_eq!(&script[5..7], &[0x01, 0x04]);
        assert_eq!(&script[7..9], &[0x4c, 95]);
        assert_eq!(&script[9..], GENESIS_TIMESTAMP_MESSAGE.as_bytes());
        // zero-value pay-to-pubkey with a trailing CHECKSIG
        assert_eq!(tx.outputs[0].value, 0);
        assert_eq!(*tx.outputs[0].script_pubkey.last().unwrap(), OP_CHECKSIG);
        assert_eq!(tx.comment, GENESIS_COMMENT);
    }

    #[test]
    fn test_mine_genesis_terminates_on_trivial_target() {
        // A ceiling of ~max accepts essentially any hash, so the search
        // returns after at most a couple of nonce increments.
        let block = genesis_block("throwaway network", genesis_inputs(Network::Regtest));
        let target = pow::pow_limit_right_shift(1);
        let mined = mine_genesis(block, &target);
        assert!(pow::hash_meets_target(&mined.header.hash(), &target));
    }
}
