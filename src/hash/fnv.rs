//! hash/fnv - 64-bit FNV-1a.
//!
//! fold: hash = (hash ^ byte) * FNV_PRIME (wrapping).
//! Seedable, so a long key can be hashed block by block:
//!   fnv1a_hash(fnv1a_hash(FNV_OFFSET_BASIS, a), b) == fnv1a(a ++ b)

use std::hash::{BuildHasherDefault, Hasher};

/// Offset basis (seed of the default entry points).
pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// 64-bit FNV prime.
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Continue an FNV-1a hash from `seed` over `bytes`.
#[inline]
pub fn fnv1a_hash(seed: u64, bytes: &[u8]) -> u64 {
    let mut hash = seed;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// FNV-1a of `bytes`, seeded with the offset basis.
#[inline]
pub fn fnv1a(bytes: &[u8]) -> u64 {
    fnv1a_hash(FNV_OFFSET_BASIS, bytes)
}

/// FNV-1a over a NUL-terminated string: stops at the first 0 byte (or at the end
/// of the slice if there is none). The terminator itself is not hashed.
#[inline]
pub fn fnv1a_hash_cstr(seed: u64, bytes: &[u8]) -> u64 {
    let mut hash = seed;
    for &b in bytes.iter().take_while(|&&b| b != 0) {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Streaming FNV-1a for std maps (`HashMap<K, V, FnvBuildHasher>`).
#[derive(Debug, Clone, Copy)]
pub struct FnvHasher(u64);

impl FnvHasher {
    pub fn with_seed(seed: u64) -> Self {
        FnvHasher(seed)
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        FnvHasher(FNV_OFFSET_BASIS)
    }
}

impl Hasher for FnvHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.0 = fnv1a_hash(self.0, bytes);
    }
}

pub type FnvBuildHasher = BuildHasherDefault<FnvHasher>;
