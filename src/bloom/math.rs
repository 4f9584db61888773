//! bloom/math - sizing formulas.

use std::f64::consts::LN_2;

/// Hash function count minimising false positives for `bit_count` bits and `n` keys:
/// round(max(1, bit_count/n * ln 2)). n <= 1 gives 1.
pub fn optimal_hash_count(bit_count: usize, n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    let k = (bit_count as f64 / n as f64) * LN_2;
    k.max(1.0).round() as usize
}

/// Expected false-positive rate after inserting `n` keys into `bit_count` bits with
/// the (unrounded) optimal k = bit_count/n * ln 2.
pub fn expected_error_rate(bit_count: usize, n: usize) -> f64 {
    if n == 0 || bit_count == 0 {
        return 1.0;
    }
    let k = (bit_count as f64 / n as f64) * LN_2;
    error_rate_for(bit_count, n, k)
}

/// False-positive rate for `n` keys in `bit_count` bits probed by `k` hashes:
///   (1 - (1 - 1/bit_count)^(k*n))^k
/// Degenerate sizes (no bits, no keys or no hashes) report 1.0.
pub fn error_rate_for(bit_count: usize, n: usize, k: f64) -> f64 {
    if n == 0 || bit_count == 0 || k <= 0.0 {
        return 1.0;
    }
    let m = bit_count as f64;
    let p_zero = (1.0 - 1.0 / m).powf(k * n as f64);
    (1.0 - p_zero).powf(k)
}
