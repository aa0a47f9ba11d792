//! Cryptographic primitives for VKCoin.
//!
//! Transaction identity on this chain is a **single** SHA-256 over the
//! canonical encoding (a quirk inherited from the chain's launch code and
//! frozen forever by the pinned genesis merkle root). Block headers and
//! base58check checksums use double SHA-256.

use sha2::{Digest, Sha256};

use crate::core::types::Hash256;

/// Single SHA-256.
pub fn sha256(data: &[u8]) -> Hash256 {
    let digest = Sha256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Double SHA-256 (hash-of-hash), Bitcoin style.
pub fn double_sha256(data: &[u8]) -> Hash256 {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut out = [0u8; 32];
    out.copy_from_slice(&second);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        // SHA-256("abc")
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_double_sha256_is_hash_of_hash() {
        let once = sha256(b"vkcoin");
        assert_eq!(double_sha256(b"vkcoin"), sha256(&once));
    }
}
