//! Checkpoint registry for VKCoin.
//!
//! Checkpoints pin (height, hash) pairs on the canonical chain. A candidate
//! chain whose block at a pinned height carries a different hash is
//! rejected outright, which bounds how far back history can be rewritten.
//! The registry also carries coarse statistics about the last checkpoint
//! used to estimate sync progress for user interfaces — advisory only,
//! never consulted by consensus.
//!
//! What makes a good checkpoint block: surrounded by blocks with
//! reasonable timestamps, and containing no strange transactions.

use std::collections::BTreeMap;
use std::fmt;

use crate::core::types::{hash256_to_hex, Hash256};

/// Relative cost of script-checked (post-checkpoint) transactions versus
/// ones under a checkpoint, for progress estimation.
const SIGCHECK_VERIFICATION_FACTOR: f64 = 5.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// A candidate chain failed checkpoint verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointMismatch {
    pub height: u64,
    pub expected: Hash256,
    pub found: Hash256,
}

impl fmt::Display for CheckpointMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "checkpoint mismatch at height {}: expected {}, found {}",
            self.height,
            hash256_to_hex(&self.expected),
            hash256_to_hex(&self.found),
        )
    }
}

impl std::error::Error for CheckpointMismatch {}

/// Height → hash pins plus sync-progress metadata for one network.
#[derive(Debug, Clone)]
pub struct CheckpointRegistry {
    checkpoints: BTreeMap<u64, Hash256>,
    /// Unix timestamp of the last checkpoint block
    pub last_checkpoint_time: u64,
    /// Total transactions between genesis and the last checkpoint
    pub transactions_last_checkpoint: u64,
    /// Estimated transactions per day after the last checkpoint
    pub transactions_per_day: f64,
}

impl CheckpointRegistry {
    /// Build a registry from pinned entries.
    ///
    /// Entries must arrive in strictly increasing height order; anything
    /// else is a defect in the compiled-in tables.
    pub fn new(
        entries: &[(u64, Hash256)],
        last_checkpoint_time: u64,
        transactions_last_checkpoint: u64,
        transactions_per_day: f64,
    ) -> Self {
        let mut checkpoints = BTreeMap::new();
        let mut prev: Option<u64> = None;
        for &(height, hash) in entries {
            if let Some(p) = prev {
                assert!(height > p, "checkpoint heights must be strictly increasing");
            }
            prev = Some(height);
            checkpoints.insert(height, hash);
        }
        CheckpointRegistry {
            checkpoints,
            last_checkpoint_time,
            transactions_last_checkpoint,
            transactions_per_day,
        }
    }

    /// The pinned hash at `height`, if that height is checkpointed.
    pub fn lookup(&self, height: u64) -> Option<Hash256> {
        self.checkpoints.get(&height).copied()
    }

    /// Height of the highest checkpoint, if any.
    pub fn highest_height(&self) -> Option<u64> {
        self.checkpoints.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Verify a candidate chain against the pins.
    ///
    /// `candidate` is the chain's block hashes indexed by height. The
    /// highest checkpointed height at or below the candidate's tip is
    /// compared; a mismatch rejects this candidate only — the registry and
    /// any other candidate are unaffected.
    pub fn verify(&self, candidate: &[Hash256]) -> Result<(), CheckpointMismatch> {
        let Some(tip_height) = candidate.len().checked_sub(1) else {
            return Ok(());
        };

        let checkpoint = self
            .checkpoints
            .range(..=tip_height as u64)
            .next_back()
            .map(|(&h, &hash)| (h, hash));

        let Some((height, expected)) = checkpoint else {
            return Ok(());
        };

        let found = candidate[height as usize];
        if found != expected {
            let mismatch = CheckpointMismatch { height, expected, found };
            tracing::warn!("rejecting candidate chain: {}", mismatch);
            return Err(mismatch);
        }
        Ok(())
    }

    /// Approximate fraction of the chain verified so far, in [0, 1].
    ///
    /// `tip_txs` is the cumulative transaction count at the candidate tip,
    /// `tip_time` its block timestamp, `now` the current wall clock. Blocks
    /// under the last checkpoint are cheap (no script checks), later ones
    /// are weighted by [`SIGCHECK_VERIFICATION_FACTOR`]. Advisory only.
    pub fn estimate_progress(&self, tip_txs: u64, tip_time: u64, now: u64) -> f64 {
        let tip_txs = tip_txs as f64;
        let pinned_txs = self.transactions_last_checkpoint as f64;

        let (work_before, work_after) = if tip_txs <= pinned_txs {
            let cheap_after = pinned_txs - tip_txs;
            let expensive_after = days_since(self.last_checkpoint_time, now)
                * self.transactions_per_day
                * SIGCHECK_VERIFICATION_FACTOR;
            (tip_txs, cheap_after + expensive_after)
        } else {
            let expensive_before = (tip_txs - pinned_txs) * SIGCHECK_VERIFICATION_FACTOR;
            let expensive_after = days_since(tip_time, now)
                * self.transactions_per_day
                * SIGCHECK_VERIFICATION_FACTOR;
            (pinned_txs + expensive_before, expensive_after)
        };

        let total = work_before + work_after;
        if total <= 0.0 {
            // No metadata at all (regtest-style registry): report synced.
            return 1.0;
        }
        (work_before / total).clamp(0.0, 1.0)
    }
}

fn days_since(earlier: u64, now: u64) -> f64 {
    now.saturating_sub(earlier) as f64 / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(tag: u8) -> Hash256 {
        [tag; 32]
    }

    fn registry() -> CheckpointRegistry {
        CheckpointRegistry::new(
            &[(0, hash(0xaa)), (5, hash(0xbb)), (9, hash(0xcc))],
            1_541_462_400,
            1_825_820,
            3000.0,
        )
    }

    #[test]
    fn test_lookup() {
        let reg = registry();
        assert_eq!(reg.lookup(0), Some(hash(0xaa)));
        assert_eq!(reg.lookup(5), Some(hash(0xbb)));
        assert_eq!(reg.lookup(1), None);
        assert_eq!(reg.lookup(100), None);
        assert_eq!(reg.highest_height(), Some(9));
    }

    #[test]
    fn test_verify_passes_matching_chain() {
        let reg = registry();
        let mut chain = vec![hash(0xaa); 8];
        chain[5] = hash(0xbb);
        assert!(reg.verify(&chain).is_ok());
    }

    #[test]
    fn test_verify_rejects_mismatch_at_highest_pin() {
        let reg = registry();
        // tip above the last checkpoint, wrong hash at height 9
        let mut chain = vec![hash(0xaa); 12];
        chain[5] = hash(0xbb);
        chain[9] = hash(0xee);
        let err = reg.verify(&chain).unwrap_err();
        assert_eq!(err.height, 9);
        assert_eq!(err.expected, hash(0xcc));
        assert_eq!(err.found, hash(0xee));
    }

    #[test]
    fn test_verify_rejection_leaves_registry_usable() {
        let reg = registry();
        let bad = vec![hash(0xee); 12];
        assert!(reg.verify(&bad).is_err());
        // other candidates are unaffected by a rejection
        let mut good = vec![hash(0xaa); 8];
        good[5] = hash(0xbb);
        assert!(reg.verify(&good).is_ok());
        assert_eq!(reg.lookup(0), Some(hash(0xaa)));
    }

    #[test]
    fn test_verify_short_and_empty_chains() {
        let reg = CheckpointRegistry::new(&[(5, hash(0xbb))], 0, 0, 0.0);
        // tip below the lowest checkpoint: nothing to compare
        assert!(reg.verify(&[hash(0x01); 3]).is_ok());
        assert!(reg.verify(&[]).is_ok());
    }

    #[test]
    #[should_panic(expected = "strictly increasing")]
    fn test_unsorted_entries_are_a_defect() {
        CheckpointRegistry::new(&[(5, hash(1)), (5, hash(2))], 0, 0, 0.0);
    }

    #[test]
    fn test_estimate_progress_monotone_in_tip_txs() {
        let reg = registry();
        let now = 1_700_000_000;
        let early = reg.estimate_progress(10_000, 1_600_000_000, now);
        let late = reg.estimate_progress(1_825_820, 1_650_000_000, now);
        assert!((0.0..=1.0).contains(&early));
        assert!((0.0..=1.0).contains(&late));
        assert!(late > early);
    }

    #[test]
    fn test_estimate_progress_recent_tip_approaches_one() {
        let reg = registry();
        let now = 1_700_000_000;
        let p = reg.estimate_progress(2_000_000, now, now);
        assert!(p > 0.99);
    }

    #[test]
    fn test_estimate_progress_empty_metadata_reports_synced() {
        let reg = CheckpointRegistry::new(&[], 0, 0, 0.0);
        assert_eq!(reg.estimate_progress(0, 0, 0), 1.0);
    }
}
