//! Compact difficulty targets for VKCoin.
//!
//! The chain expresses proof-of-work difficulty the Bitcoin way: a 256-bit
//! target ceiling per network ("proof of work limit") and a compact 32-bit
//! encoding ("nBits") carried in each block header. A header satisfies the
//! proof of work when its hash, read as a little-endian 256-bit integer, is
//! less than or equal to the target decoded from its nBits.
//!
//! Compact format: `0xEEMMMMMM` where `EE` is a base-256 exponent and
//! `MMMMMM` a 3-byte mantissa, i.e. `target = mantissa * 256^(exponent-3)`.
//! Bit 0x00800000 of the mantissa is the legacy sign flag and is never set
//! by this encoder.

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::core::types::Hash256;

/// Legacy sign flag inside the compact mantissa.
const COMPACT_SIGN_BIT: u32 = 0x0080_0000;

/// The all-ones 256-bit value shifted right by `shift` bits.
///
/// Network PoW ceilings are all expressed this way: main uses `>> 20`,
/// the test networks use `>> 1` (accept nearly any hash).
pub fn pow_limit_right_shift(shift: u32) -> BigUint {
    let max: BigUint = (BigUint::one() << 256u32) - BigUint::one();
    max >> shift
}

/// Decode a compact "nBits" value into a 256-bit target.
///
/// Overflowing encodings (exponent pushing the mantissa past 256 bits) and
/// the sign flag produce a zero target, which no hash can satisfy.
pub fn compact_to_target(bits: u32) -> BigUint {
    let exponent = (bits >> 24) as u32;
    let mantissa = bits & 0x007f_ffff;

    if bits & COMPACT_SIGN_BIT != 0 {
        return BigUint::zero();
    }
    if mantissa == 0 {
        return BigUint::zero();
    }

    if exponent <= 3 {
        BigUint::from(mantissa >> (8 * (3 - exponent)))
    } else {
        if exponent > 34 {
            // Would exceed 256 bits for any nonzero mantissa.
            return BigUint::zero();
        }
        BigUint::from(mantissa) << (8 * (exponent - 3))
    }
}

/// Encode a 256-bit target in compact form.
pub fn target_to_compact(target: &BigUint) -> u32 {
    if target.is_zero() {
        return 0;
    }

    let mut size = ((target.bits() + 7) / 8) as u32;
    let mut compact: u32 = if size <= 3 {
        let low = target.to_u32().unwrap_or(0);
        low << (8 * (3 - size))
    } else {
        let shifted = target >> (8 * (size - 3));
        shifted.to_u32().unwrap_or(0)
    };

    // Mantissa with the sign bit set would read back negative; renormalize.
    if compact & COMPACT_SIGN_BIT != 0 {
        compact >>= 8;
        size += 1;
    }

    compact | (size << 24)
}

/// Check a block hash against a decoded target.
///
/// Header hashes are compared as little-endian 256-bit integers.
pub fn hash_meets_target(hash: &Hash256, target: &BigUint) -> bool {
    !target.is_zero() && BigUint::from_bytes_le(hash) <= *target
}
