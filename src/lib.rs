//! VKCoin chain-parameter subsystem.
//!
//! Defines, per network variant, the immutable consensus constants,
//! constructs and certifies the genesis block, maintains the checkpoint
//! registry that bounds historical reorganization, and converts the
//! compiled-in bootstrap seeds into peer records.
//!
//! A process picks its network exactly once at startup:
//!
//! ```
//! use vkcoin::core::params::{select_params, params, Network};
//!
//! select_params(Network::Regtest);
//! assert_eq!(params().default_port, 52322);
//! ```
//!
//! After selection every record is immutable and safe to read from any
//! thread without locks. The unit-test network alone exposes a small
//! mutation surface for test harnesses, behind
//! [`core::params::modifiable_params`].

pub mod core;
pub mod crypto;
pub mod network;
pub mod pow;
