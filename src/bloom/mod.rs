//! bloom - fixed-size in-memory Bloom filter.
//!
//! - mod.rs  - BloomFilter<BITS> (insert/contains, fill statistics).
//! - math.rs - optimal_hash_count / expected_error_rate / error_rate_for.
//!
//! Positions use double hashing over two independent 64-bit hashes:
//!   h0 = fast_hash(key) (xxh64 by default, replaceable), h1 = fnv1a(key)
//!   k == 1: bit = h0 mod BITS
//!   k > 1:  bit_i = (h0 + i*h1) mod BITS, i in 0..k
//! No removal: bits are only ever set.

pub mod math;

pub use math::{error_rate_for, expected_error_rate, optimal_hash_count};

use crate::hash::{fast_hash, fnv1a};

/// Signature of the primary (fast) hash.
pub type FastHashFn = fn(&[u8]) -> u64;

#[derive(Clone)]
pub struct BloomFilter<const BITS: usize> {
    bits: Box<[u8]>,
    hash_functions: usize,
    fast_hash: FastHashFn,
}

impl<const BITS: usize> BloomFilter<BITS> {
    const MIN_BITS_CHECK: () = assert!(BITS >= 10, "BloomFilter needs at least 10 bits");

    /// Empty filter using `hash_functions` positions per key (0 is taken as 1).
    pub fn new(hash_functions: usize) -> Self {
        Self::with_hasher(hash_functions, fast_hash)
    }

    /// Empty filter with a caller-supplied primary hash.
    pub fn with_hasher(hash_functions: usize, fast_hash: FastHashFn) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::MIN_BITS_CHECK;
        BloomFilter {
            bits: vec![0u8; BITS.div_ceil(8)].into_boxed_slice(),
            hash_functions: hash_functions.max(1),
            fast_hash,
        }
    }

    /// Empty filter sized for `expected_keys` keys.
    pub fn for_capacity(expected_keys: usize) -> Self {
        Self::new(Self::optimal_hash_count(expected_keys))
    }

    /// optimal_hash_count() for this filter's size.
    #[inline]
    pub fn optimal_hash_count(n: usize) -> usize {
        optimal_hash_count(BITS, n)
    }

    #[inline]
    pub fn bit_count(&self) -> usize {
        BITS
    }

    #[inline]
    pub fn hash_function_count(&self) -> usize {
        self.hash_functions
    }

    pub fn insert(&mut self, key: &[u8]) {
        let h0 = (self.fast_hash)(key);
        if self.hash_functions == 1 {
            set_bit(&mut self.bits, bit_index::<BITS>(h0));
            return;
        }
        let h1 = fnv1a(key);
        for i in 0..self.hash_functions as u64 {
            let hv = h0.wrapping_add(i.wrapping_mul(h1));
            set_bit(&mut self.bits, bit_index::<BITS>(hv));
        }
    }

    /// false = definitely never inserted; true = inserted or a false positive.
    pub fn contains(&self, key: &[u8]) -> bool {
        let h0 = (self.fast_hash)(key);
        if self.hash_functions == 1 {
            return get_bit(&self.bits, bit_index::<BITS>(h0));
        }
        let h1 = fnv1a(key);
        for i in 0..self.hash_functions as u64 {
            let hv = h0.wrapping_add(i.wrapping_mul(h1));
            if !get_bit(&self.bits, bit_index::<BITS>(hv)) {
                return false;
            }
        }
        true
    }

    /// Number of set bits.
    pub fn set_bits(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Fraction of set bits, 0.0..=1.0.
    pub fn fill_ratio(&self) -> f64 {
        self.set_bits() as f64 / BITS as f64
    }

    /// False-positive rate implied by the current fill: fill_ratio^k.
    pub fn estimated_error_rate(&self) -> f64 {
        self.fill_ratio().powi(self.hash_functions as i32)
    }

    /// Raw bit array (bit i = byte i/8, mask 1 << (i%8)).
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }
}

impl<const BITS: usize> std::fmt::Debug for BloomFilter<BITS> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BloomFilter")
            .field("bits", &BITS)
            .field("hash_functions", &self.hash_functions)
            .field("set_bits", &self.set_bits())
            .finish()
    }
}

#[inline]
fn bit_index<const BITS: usize>(hv: u64) -> usize {
    (hv % BITS as u64) as usize
}

#[inline]
fn set_bit(bytes: &mut [u8], bit: usize) {
    let byte = bit / 8;
    let mask = 1u8 << (bit % 8);
    bytes[byte] |= mask;
}

#[inline]
fn get_bit(bytes: &[u8], bit: usize) -> bool {
    let byte = bit / 8;
    let mask = 1u8 << (bit % 8);
    (bytes[byte] & mask) != 0
}
