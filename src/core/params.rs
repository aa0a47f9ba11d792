//! VKCoin chain parameters.
//!
//! Every consensus-critical constant lives here, one immutable record per
//! network variant. The main network record is the base; the other
//! variants are built from it by overwriting an explicit list of fields,
//! so the full diff between any two networks can be read off this file.
//!
//! A record is built at most once per process (lazily, behind a
//! [`OnceLock`]) and never changes afterwards; reads are lock-free from
//! any number of threads. The single exception is the unit-test network,
//! whose five test-tunable fields sit behind atomics and are writable only
//! through [`ModifiableParams`].

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::OnceLock;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::core::base58::Base58Prefixes;
use crate::core::checkpoints::CheckpointRegistry;
use crate::core::genesis;
use crate::core::types::{Block, Hash256};
use crate::network::seeds::{SeedSpec6, MAIN_DNS_SEEDS, MAIN_SEEDS};
use crate::pow;

/// Base unit denomination (like satoshis for Bitcoin)
pub const COIN: u64 = 100_000_000;

/// Network variant selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Main,
    Testnet,
    Regtest,
    UnitTest,
}

impl Network {
    /// Short network id used in log lines, datadir names and RPC.
    pub fn id(&self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Testnet => "test",
            Network::Regtest => "regtest",
            Network::UnitTest => "unittest",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The full constant set for one network variant.
///
/// Constructed once, then read-only. The five fields behind atomics are
/// plain constants everywhere except the unit-test network, where
/// [`ModifiableParams`] may retune them during single-threaded test setup.
#[derive(Debug)]
pub struct ChainParams {
    pub network: Network,

    /// Message-start magic: rarely-used upper-ASCII bytes, not valid UTF-8,
    /// chosen to be unlikely in normal traffic at any alignment.
    pub message_start: [u8; 4],
    pub default_port: u16,

    /// Proof-of-work target ceiling (easiest permitted difficulty)
    pub pow_limit: BigUint,
    /// Target above which early blocks are accepted while the chain ramps up
    pub start_work: BigUint,

    pub max_reorganization_depth: u64,
    enforce_block_upgrade_majority: AtomicU32,
    reject_block_outdated_majority: AtomicU32,
    to_check_block_upgrade_majority: AtomicU32,
    pub miner_threads: u32,

    /// Target block spacing in seconds
    pub target_spacing: u64,
    /// Block spacing before height 100 (slow launch window)
    pub target_spacing_slow_launch: u64,
    /// Proof-of-stake target spacing in seconds
    pub pos_target_spacing: u64,

    /// Coinbase maturity in blocks
    pub maturity: u64,
    pub masternode_count_drift: u32,
    /// Maximum circulating supply, in base units
    pub max_money_out: u64,
    pub start_masternode_payments_block: u64,

    /// Height of the last proof-of-work block
    pub last_pow_block: u64,
    pub modifier_update_block: u64,

    pub genesis: Block,
    pub genesis_hash: Hash256,

    pub dns_seeds: &'static [&'static str],
    pub fixed_seeds: &'static [SeedSpec6],
    pub base58_prefixes: Base58Prefixes,
    pub checkpoints: CheckpointRegistry,

    pub require_rpc_password: bool,
    pub mining_requires_peers: bool,
    default_consistency_checks: AtomicBool,
    pub require_standard: bool,
    pub mine_blocks_on_demand: bool,
    skip_proof_of_work_check: AtomicBool,
    pub testnet_to_be_deprecated_field_rpc: bool,
    pub headers_first_syncing_active: bool,

    pub pool_max_transactions: u32,
    /// Minimum stake input, in base units
    pub stake_input_min: u64,

    pub dev_fee_address_old: &'static str,
    pub dev_fee_address: &'static str,
    pub obfuscation_pool_dummy_address: &'static str,

    pub alert_pubkey: Vec<u8>,
    pub gm_pubkey: Vec<u8>,

    /// Sporks signed at or after this time must use the new spork key
    pub enforce_new_spork_key: u64,
    /// Fully reject the old spork key at or after this time
    pub reject_old_spork_key: u64,
    pub spork_key: &'static str,
    pub spork_key_old: &'static str,
}

impl ChainParams {
    pub fn enforce_block_upgrade_majority(&self) -> u32 {
        self.enforce_block_upgrade_majority.load(Ordering::Relaxed)
    }

    pub fn reject_block_outdated_majority(&self) -> u32 {
        self.reject_block_outdated_majority.load(Ordering::Relaxed)
    }

    pub fn to_check_block_upgrade_majority(&self) -> u32 {
        self.to_check_block_upgrade_majority.load(Ordering::Relaxed)
    }

    pub fn default_consistency_checks(&self) -> bool {
        self.default_consistency_checks.load(Ordering::Relaxed)
    }

    pub fn skip_proof_of_work_check(&self) -> bool {
        self.skip_proof_of_work_check.load(Ordering::Relaxed)
    }

    /// Invariants every compiled-in record must satisfy.
    fn certify(&self) {
        assert_eq!(
            self.checkpoints.lookup(0),
            Some(self.genesis_hash),
            "checkpoint at height 0 must pin the {} genesis hash",
            self.network,
        );
        assert!(
            self.reject_old_spork_key >= self.enforce_new_spork_key,
            "old spork key must not be rejected before the new one is enforced",
        );
    }
}

// ─── Per-Variant Construction ────────────────────────────────────────

fn parse_hex_key(hex: &str) -> Vec<u8> {
    hex::decode(hex).expect("compiled-in key is valid hex")
}

/// Main network: the base record every other variant is diffed from.
fn main_params() -> ChainParams {
    let genesis = genesis::checked_genesis(Network::Main);
    let genesis_hash = genesis.header.hash();

    let params = ChainParams {
        network: Network::Main,
        message_start: [0x44, 0x11, 0x2f, 0x2e],
        default_port: 8898,

        pow_limit: pow::pow_limit_right_shift(20),
        start_work: pow::pow_limit_right_shift(24),

        max_reorganization_depth: 100,
        enforce_block_upgrade_majority: AtomicU32::new(750),
        reject_block_outdated_majority: AtomicU32::new(950),
        to_check_block_upgrade_majority: AtomicU32::new(1000),
        miner_threads: 0,

        target_spacing: 60,
        target_spacing_slow_launch: 2 * 60,
        pos_target_spacing: 60,

        maturity: 20,
        masternode_count_drift: 3,
        max_money_out: 20_000_000 * COIN,
        start_masternode_payments_block: 250,

        last_pow_block: 250,
        modifier_update_block: u64::MAX,

        genesis_hash,
        checkpoints: CheckpointRegistry::new(&[(0, genesis_hash)], 1_541_462_400, 1_825_820, 3000.0),
        genesis,

        dns_seeds: MAIN_DNS_SEEDS,
        fixed_seeds: MAIN_SEEDS,
        base58_prefixes: Base58Prefixes {
            pubkey_address: [70], // 'V'
            script_address: [45], // 'K'
            secret_key: [28],     // 'C'
            ext_public_key: [0x01, 0x3A, 0x32, 0x34],
            ext_secret_key: [0x09, 0x38, 0x28, 0x2C],
            // BIP44 coin type per SLIP-0044
            ext_coin_type: [0x84, 0x05, 0x25, 0x38],
        },

        require_rpc_password: true,
        mining_requires_peers: true,
        default_consistency_checks: AtomicBool::new(false),
        require_standard: true,
        mine_blocks_on_demand: false,
        skip_proof_of_work_check: AtomicBool::new(true),
        testnet_to_be_deprecated_field_rpc: false,
        headers_first_syncing_active: false,

        pool_max_transactions: 3,
        stake_input_min: 10 * COIN,

        dev_fee_address_old: "VEUH9SuhcQK56SmiCvSUu1ouotN8N9afT5",
        dev_fee_address: "VR9wVnuTi7H2FSjh1xy9WYmR4BW8KifcAH",
        obfuscation_pool_dummy_address: "VQXk5GzAVrfLozJNruP2Qkmu4Aw4PeYtuv",

        alert_pubkey: parse_hex_key(
            "02220084c40c6daedee5cc6da2a7f9f99e37e139e8e15a8750267a2fceb1bca424",
        ),
        gm_pubkey: parse_hex_key(
            "02220084c40c6daedee5cc6da2a7f9f99e37e139e8e15a8750267a2fceb1bca424",
        ),

        // Mon Jul 18 2022 04:46:24 GMT+0000
        enforce_new_spork_key: 1_658_119_584,
        // Wed Jul 20 2022 04:46:24 GMT+0000
        reject_old_spork_key: 1_658_292_384,
        spork_key: "030b2b75d0baaee641cb3635b596e276270f542d881cde7e6cd750ec6474bb458f",
        spork_key_old: "02340828c2ea2398a576e4ac24f543952b17e7e0ff15bad28a034e927110a09ecb",
    };
    params.certify();
    params
}

/// Testnet: main's record with the test-network overrides applied.
fn testnet_params() -> ChainParams {
    let genesis = genesis::checked_genesis(Network::Testnet);
    let genesis_hash = genesis.header.hash();

    let mut p = main_params();
    p.network = Network::Testnet;
    p.message_start = [0x47, 0x77, 0x66, 0xbb];
    p.default_port = 42322;

    p.pow_limit = pow::pow_limit_right_shift(1);
    p.start_work = p.pow_limit.clone();

    p.enforce_block_upgrade_majority = AtomicU32::new(51);
    p.reject_block_outdated_majority = AtomicU32::new(75);
    p.to_check_block_upgrade_majority = AtomicU32::new(100);

    p.maturity = 15;
    p.masternode_count_drift = 4;
    p.max_money_out = 1_000_000_000 * COIN;

    p.genesis_hash = genesis_hash;
    p.checkpoints = CheckpointRegistry::new(&[(0, genesis_hash)], 1_541_462_411, 0, 250.0);
    p.genesis = genesis;

    p.dns_seeds = &[];
    p.fixed_seeds = &[];
    p.base58_prefixes = Base58Prefixes {
        pubkey_address: [137], // 'x'
        script_address: [19],  // '8' or '9'
        secret_key: [239],     // '9' or 'c' (Bitcoin defaults)
        ext_public_key: [0x3a, 0x80, 0x61, 0xa0],
        ext_secret_key: [0x3a, 0x80, 0x58, 0x37],
        ext_coin_type: [0x80, 0x00, 0x00, 0x01],
    };

    p.mining_requires_peers = false;
    p.require_standard = false;
    p.testnet_to_be_deprecated_field_rpc = true;

    p.pool_max_transactions = 2;
    p.stake_input_min = COIN;

    p.dev_fee_address = "xJETLzAQWJj18aQ74cHqAtdStrZves2U4A";
    p.obfuscation_pool_dummy_address = "xJR9MjNhPLKLLCowMWNznC9gkEQHQPjcJr";

    p.alert_pubkey = parse_hex_key(
        "04e2a902b30e8e5430e4f3d1ac79630282cc65a036d0aa70ec041d8903b9a626b601a888d8479412bcc363250b02cb2f0e783e7dbeef8606a6ab635fde952949f9",
    );
    p.gm_pubkey = parse_hex_key(
        "0414b78fd29848ca55bacabe49c6bf53c8cb5224cdd84590f21616457c564b01d2c26c69fea8a55b5e336cb40981ba3167b04ddd149a21f59ab07cf30a4b7285b1",
    );
    p.spork_key =
        "043f305881c14698ca11d9ccbbef49714a816da377bcc0b25d2d54e5a5b266605353e5ec4c7f9958899b5e7a550225d652151ada50d040277ef75ada1214f92e77";

    p.certify();
    p
}

/// Regtest: testnet's record with the regression-test overrides applied.
fn regtest_params() -> ChainParams {
    let genesis = genesis::checked_genesis(Network::Regtest);
    let genesis_hash = genesis.header.hash();

    let mut p = testnet_params();
    p.network = Network::Regtest;
    p.message_start = [0xa1, 0xcf, 0x7e, 0xac];
    p.default_port = 52322;

    p.pow_limit = pow::pow_limit_right_shift(1);
    p.start_work = pow::pow_limit_right_shift(20);

    p.enforce_block_upgrade_majority = AtomicU32::new(750);
    p.reject_block_outdated_majority = AtomicU32::new(950);
    p.to_check_block_upgrade_majority = AtomicU32::new(1000);
    p.miner_threads = 1;
    p.target_spacing = 60;

    p.genesis_hash = genesis_hash;
    p.checkpoints = CheckpointRegistry::new(&[(0, genesis_hash)], 0, 0, 0.0);
    p.genesis = genesis;

    p.require_rpc_password = false;
    p.mining_requires_peers = false;
    p.default_consistency_checks = AtomicBool::new(true);
    p.require_standard = false;
    p.mine_blocks_on_demand = true;
    p.testnet_to_be_deprecated_field_rpc = false;

    p.certify();
    p
}

/// Unit-test network: main's record with a reduced footprint, plus the
/// mutation surface reachable through [`ModifiableParams`].
fn unittest_params() -> ChainParams {
    let mut p = main_params();
    p.network = Network::UnitTest;
    p.default_port = 51478;

    p.dns_seeds = &[];
    p.fixed_seeds = &[];

    p.require_rpc_password = false;
    p.mining_requires_peers = false;
    p.default_consistency_checks = AtomicBool::new(true);
    p.mine_blocks_on_demand = true;

    // Shares main's genesis and checkpoints.
    p.certify();
    p
}

// ─── Variant Lookup & Selection ──────────────────────────────────────

static MAIN_PARAMS: OnceLock<ChainParams> = OnceLock::new();
static TESTNET_PARAMS: OnceLock<ChainParams> = OnceLock::new();
static REGTEST_PARAMS: OnceLock<ChainParams> = OnceLock::new();
static UNITTEST_PARAMS: OnceLock<ChainParams> = OnceLock::new();

static ACTIVE_NETWORK: OnceLock<Network> = OnceLock::new();

/// The parameter set for `network`, built on first use.
pub fn params_for(network: Network) -> &'static ChainParams {
    match network {
        Network::Main => MAIN_PARAMS.get_or_init(main_params),
        Network::Testnet => TESTNET_PARAMS.get_or_init(testnet_params),
        Network::Regtest => REGTEST_PARAMS.get_or_init(regtest_params),
        Network::UnitTest => UNITTEST_PARAMS.get_or_init(unittest_params),
    }
}

/// Bind the process to `network`. Must run once, before any [`params`]
/// call, on the startup thread.
///
/// Re-selecting the same network is a no-op; selecting a different one is
/// a defect and aborts.
pub fn select_params(network: Network) -> &'static ChainParams {
    let chosen = *ACTIVE_NETWORK.get_or_init(|| network);
    assert_eq!(
        chosen, network,
        "network parameters already selected ({} is active)",
        chosen,
    );
    let params = params_for(network);
    tracing::info!("selected {} network parameters", network);
    params
}

/// The active parameter set. Aborts if [`select_params`] has not run.
pub fn params() -> &'static ChainParams {
    let network = ACTIVE_NETWORK
        .get()
        .expect("chain parameters accessed before select_params()");
    params_for(*network)
}

/// Whether a network has been selected yet.
pub fn params_selected() -> bool {
    ACTIVE_NETWORK.get().is_some()
}

/// Write handle over the unit-test network's tunable fields.
///
/// Obtainable only while the unit-test network is active; setters are
/// meant for single-threaded test setup before any worker threads exist.
pub struct ModifiableParams {
    params: &'static ChainParams,
}

/// The mutation surface for test harnesses. Aborts unless the active
/// network is [`Network::UnitTest`].
pub fn modifiable_params() -> ModifiableParams {
    let params = params();
    assert_eq!(
        params.network,
        Network::UnitTest,
        "modifiable parameters requested while {} is active",
        params.network,
    );
    ModifiableParams { params }
}

impl ModifiableParams {
    pub fn set_enforce_block_upgrade_majority(&self, value: u32) {
        self.params.enforce_block_upgrade_majority.store(value, Ordering::Relaxed);
    }

    pub fn set_reject_block_outdated_majority(&self, value: u32) {
        self.params.reject_block_outdated_majority.store(value, Ordering::Relaxed);
    }

    pub fn set_to_check_block_upgrade_majority(&self, value: u32) {
        self.params.to_check_block_upgrade_majority.store(value, Ordering::Relaxed);
    }

    pub fn set_default_consistency_checks(&self, value: bool) {
        self.params.default_consistency_checks.store(value, Ordering::Relaxed);
    }

    pub fn set_skip_proof_of_work_check(&self, value: bool) {
        self.params.skip_proof_of_work_check.store(value, Ordering::Relaxed);
    }
}
