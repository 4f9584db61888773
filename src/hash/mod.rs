//! hash - stateless hashing/checksum primitives.
//!
//! - fnv.rs   - FNV-1a 64 (seeded, NUL-terminated variant, std Hasher).
//! - crc32.rs - table-driven CRC-32 IEEE (block API used by the marker codec).
//! - fast_hash (here) - xxh64, the second hash of the Bloom filter.

pub mod crc32;
pub mod fnv;

pub use crc32::{
    crc32, crc32_block, crc32_finalize, crc32_initial, Crc32Table, IEEE_TABLE,
};
pub use fnv::{fnv1a, fnv1a_hash, fnv1a_hash_cstr, FnvBuildHasher, FnvHasher, FNV_OFFSET_BASIS};

/// Seed of the default fast hash.
pub const FAST_HASH_SEED: u64 = 0;

/// xxh64 of `bytes` with `seed`.
#[inline]
pub fn xxh64(bytes: &[u8], seed: u64) -> u64 {
    use std::hash::Hasher;
    let mut h = twox_hash::XxHash64::with_seed(seed);
    h.write(bytes);
    h.finish()
}

/// Default fast 64-bit hash (xxh64, seed 0).
#[inline]
pub fn fast_hash(bytes: &[u8]) -> u64 {
    xxh64(bytes, FAST_HASH_SEED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_hash_is_xxh64_seed0() {
        // xxh64("") with seed 0.
        assert_eq!(fast_hash(b""), 0xEF46_DB37_51D8_E999);
        assert_ne!(fast_hash(b"a"), fnv1a(b"a"));
    }
}
