//! Bootstrap peer material for VKCoin.
//!
//! Converts compiled-in seed records into runtime peer addresses. Each
//! converted seed is given a random apparent age of one to two weeks: a
//! fresh node will try only a seed or two before learning newer-stamped
//! addresses from them, so the hardcoded seeds obsolete themselves after
//! first contact instead of being hammered by every new node at once.

use std::net::{IpAddr, Ipv6Addr, SocketAddr};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::network::seeds::SeedSpec6;

pub mod seeds;

/// One week in seconds.
pub const ONE_WEEK: u64 = 7 * 24 * 60 * 60;

/// A bootstrap peer as handed to the address manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerAddress {
    pub addr: SocketAddr,
    /// Unix timestamp the address was "last seen"
    pub last_seen: u64,
}

/// Convert compiled seeds into peer records with staggered apparent ages.
///
/// Every record's `last_seen` is drawn uniformly and independently from
/// `[now - 2 weeks, now - 1 week)`; addresses and ports are copied
/// verbatim and the output preserves order and count. The randomness only
/// spreads bootstrap load, so it does not need to be cryptographic — just
/// uniform over the interval.
pub fn convert_seed6<R: Rng>(seeds: &[SeedSpec6], now: u64, rng: &mut R) -> Vec<PeerAddress> {
    seeds
        .iter()
        .map(|seed| {
            let jitter = rng.gen_range(0..ONE_WEEK);
            PeerAddress {
                addr: seed_socket_addr(seed),
                last_seen: now.saturating_sub(2 * ONE_WEEK - jitter),
            }
        })
        .collect()
}

/// Render a 16-byte seed address as a socket address, unmapping v4 entries.
pub fn seed_socket_addr(seed: &SeedSpec6) -> SocketAddr {
    let v6 = Ipv6Addr::from(seed.addr);
    let ip = match v6.to_ipv4_mapped() {
        Some(v4) => IpAddr::V4(v4),
        None => IpAddr::V6(v6),
    };
    SocketAddr::new(ip, seed.port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::seeds::MAIN_SEEDS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const NOW: u64 = 1_700_000_000;

    #[test]
    fn test_conversion_preserves_count_and_addresses() {
        let mut rng = StdRng::seed_from_u64(7);
        let peers = convert_seed6(MAIN_SEEDS, NOW, &mut rng);
        assert_eq!(peers.len(), MAIN_SEEDS.len());
        for (peer, seed) in peers.iter().zip(MAIN_SEEDS) {
            assert_eq!(peer.addr, seed_socket_addr(seed));
            assert_eq!(peer.addr.port(), seed.port);
        }
        assert_eq!(peers[0].addr.to_string(), "202.68.164.26:8898");
    }

    #[test]
    fn test_last_seen_within_one_to_two_weeks() {
        let mut rng = StdRng::seed_from_u64(42);
        for peer in convert_seed6(MAIN_SEEDS, NOW, &mut rng) {
            assert!(peer.last_seen >= NOW - 2 * ONE_WEEK);
            assert!(peer.last_seen < NOW - ONE_WEEK);
        }
    }

    #[test]
    fn test_distinct_draws_give_distinct_timestamps() {
        let mut rng_a = StdRng::seed_from_u64(1);
        let mut rng_b = StdRng::seed_from_u64(2);
        let a = convert_seed6(MAIN_SEEDS, NOW, &mut rng_a);
        let b = convert_seed6(MAIN_SEEDS, NOW, &mut rng_b);
        let stamps_a: Vec<u64> = a.iter().map(|p| p.last_seen).collect();
        let stamps_b: Vec<u64> = b.iter().map(|p| p.last_seen).collect();
        assert_ne!(stamps_a, stamps_b);
    }

    #[test]
    fn test_v6_seed_stays_v6() {
        let seed = SeedSpec6 {
            addr: [0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            port: 8898,
        };
        let addr = seed_socket_addr(&seed);
        assert!(addr.is_ipv6());
        assert_eq!(addr.port(), 8898);
    }
}
