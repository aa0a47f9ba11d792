//! Base58 prefixes and base58check material for VKCoin.
//!
//! Every key-like object the node hands to a user is base58check-encoded
//! behind a short network- and kind-specific prefix, so a mainnet address
//! can never be mistaken for a testnet one (or a secret key for either).
//! The prefix table is part of [`ChainParams`](crate::core::params) and is
//! immutable once the owning parameter set is built.

use std::fmt;

use crate::crypto;

/// The kinds of base58-encoded material the chain produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    PubkeyAddress,
    ScriptAddress,
    SecretKey,
    ExtPublicKey,
    ExtSecretKey,
    /// BIP44 coin type, per SLIP-0044
    ExtCoinType,
}

impl KeyKind {
    /// Kinds that participate in user-visible address formatting. The
    /// per-network prefix sets must stay disjoint across these.
    pub const ADDRESS_KINDS: [KeyKind; 3] =
        [KeyKind::PubkeyAddress, KeyKind::ScriptAddress, KeyKind::SecretKey];
}

/// Per-network byte prefixes for each [`KeyKind`].
///
/// One field per kind: a missing kind is unrepresentable, which is exactly
/// the contract (asking for a prefix can never fail at runtime).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base58Prefixes {
    pub pubkey_address: [u8; 1],
    pub script_address: [u8; 1],
    pub secret_key: [u8; 1],
    pub ext_public_key: [u8; 4],
    pub ext_secret_key: [u8; 4],
    pub ext_coin_type: [u8; 4],
}

impl Base58Prefixes {
    pub fn prefix(&self, kind: KeyKind) -> &[u8] {
        match kind {
            KeyKind::PubkeyAddress => &self.pubkey_address,
            KeyKind::ScriptAddress => &self.script_address,
            KeyKind::SecretKey => &self.secret_key,
            KeyKind::ExtPublicKey => &self.ext_public_key,
            KeyKind::ExtSecretKey => &self.ext_secret_key,
            KeyKind::ExtCoinType => &self.ext_coin_type,
        }
    }
}

// ─── Base58check ─────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
pub enum Base58Error {
    /// Not valid base58
    BadEncoding,
    /// Shorter than a checksum
    TooShort,
    /// Checksum mismatch
    BadChecksum,
}

impl fmt::Display for Base58Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Base58Error::BadEncoding => write!(f, "invalid base58 string"),
            Base58Error::TooShort => write!(f, "base58check payload too short"),
            Base58Error::BadChecksum => write!(f, "base58check checksum mismatch"),
        }
    }
}

impl std::error::Error for Base58Error {}

/// Encode `payload` (prefix bytes already prepended) with a 4-byte
/// double-SHA-256 checksum.
pub fn base58check_encode(payload: &[u8]) -> String {
    let checksum = crypto::double_sha256(payload);
    let mut data = Vec::with_capacity(payload.len() + 4);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum[..4]);
    bs58::encode(data).into_string()
}

/// Decode a base58check string, returning the payload with its prefix
/// bytes still attached.
pub fn base58check_decode(s: &str) -> Result<Vec<u8>, Base58Error> {
    let data = bs58::decode(s).into_vec().map_err(|_| Base58Error::BadEncoding)?;
    if data.len() < 4 {
        return Err(Base58Error::TooShort);
    }
    let (payload, checksum) = data.split_at(data.len() - 4);
    let expected = crypto::double_sha256(payload);
    if checksum != &expected[..4] {
        return Err(Base58Error::BadChecksum);
    }
    Ok(payload.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let payload = {
            let mut v = vec![70u8];
            v.extend_from_slice(&[0x5a; 20]);
            v
        };
        let encoded = base58check_encode(&payload);
        assert_eq!(base58check_decode(&encoded).unwrap(), payload);
    }

    #[test]
    fn test_mainnet_pubkey_prefix_yields_v_addresses() {
        for fill in [0x00u8, 0x7f, 0xff] {
            let mut payload = vec![70u8];
            payload.extend_from_slice(&[fill; 20]);
            let encoded = base58check_encode(&payload);
            assert!(encoded.starts_with('V'), "got {}", encoded);
        }
    }

    #[test]
    fn test_testnet_pubkey_prefix_yields_x_addresses() {
        for fill in [0x00u8, 0xff] {
            let mut payload = vec![137u8];
            payload.extend_from_slice(&[fill; 20]);
            let encoded = base58check_encode(&payload);
            assert!(encoded.starts_with('x'), "got {}", encoded);
        }
    }

    #[test]
    fn test_corrupted_checksum_rejected() {
        let payload = vec![70u8; 21];
        let mut encoded = base58check_encode(&payload);
        // flip the last character to another base58 character
        let last = encoded.pop().unwrap();
        encoded.push(if last == '2' { '3' } else { '2' });
        assert_eq!(base58check_decode(&encoded), Err(Base58Error::BadChecksum));
    }

    #[test]
    fn test_bad_encoding_rejected() {
        assert_eq!(base58check_decode("0OIl"), Err(Base58Error::BadEncoding));
    }

    #[test]
    fn test_too_short_rejected() {
        // "1" decodes to a single zero byte
        assert_eq!(base58check_decode("1"), Err(Base58Error::TooShort));
    }
}
