//! Core chain definitions: consensus constants, genesis, checkpoints.

pub mod base58;
pub mod checkpoints;
pub mod genesis;
pub mod params;
pub mod script;
pub mod types;
