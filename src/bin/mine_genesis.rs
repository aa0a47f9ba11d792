//! Offline genesis miner.
//!
//! Developer tool for minting a brand-new network: searches for a nonce
//! whose block hash satisfies the difficulty target, bumping the timestamp
//! whenever the nonce wraps. Unbounded and CPU-bound; it is never run as
//! part of node startup — loading an existing network always goes through
//! the pinned-constant certification path instead.

use clap::Parser;
use num_traits::Zero;

use vkcoin::core::genesis::{self, GenesisInputs};
use vkcoin::core::types::hash256_to_hex;
use vkcoin::pow;

#[derive(Parser)]
#[command(name = "mine-genesis", version)]
#[command(about = "Search for a valid genesis block for a new VKCoin network")]
struct Cli {
    /// Coinbase timestamp message for the new chain
    #[arg(short, long, default_value = genesis::GENESIS_TIMESTAMP_MESSAGE)]
    message: String,
    /// Genesis block timestamp (unix seconds)
    #[arg(short, long)]
    time: u32,
    /// Compact difficulty target ("nBits"), hex
    #[arg(short, long, default_value = "1e0ffff0", value_parser = parse_bits)]
    bits: u32,
    /// Nonce to start the search from
    #[arg(short, long, default_value_t = 0)]
    start_nonce: u32,
}

fn parse_bits(s: &str) -> Result<u32, String> {
    u32::from_str_radix(s.trim_start_matches("0x"), 16).map_err(|e| e.to_string())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vkcoin=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let inputs = GenesisInputs { timestamp: cli.time, bits: cli.bits, nonce: cli.start_nonce };
    let target = pow::compact_to_target(cli.bits);
    if target.is_zero() {
        eprintln!("bits {:08x} decode to a zero target; nothing can satisfy it", cli.bits);
        std::process::exit(1);
    }

    let block = genesis::genesis_block(&cli.message, inputs);
    let mined = genesis::mine_genesis(block, &target);

    println!("block.time   = {}", mined.header.timestamp);
    println!("block.nonce  = {}", mined.header.nonce);
    println!("block.bits   = {:08x}", mined.header.bits);
    println!("block.hash   = {}", hash256_to_hex(&mined.header.hash()));
    println!("block.merkle = {}", hash256_to_hex(&mined.header.merkle_root));
}
