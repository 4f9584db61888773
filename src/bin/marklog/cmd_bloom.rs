use anyhow::{anyhow, Result};

use marklog::bloom::{error_rate_for, optimal_hash_count};
use marklog::MarklogConfig;

pub fn exec(bits: usize, keys: usize, hashes: Option<usize>) -> Result<()> {
    if bits < 10 {
        return Err(anyhow!("bloom filter needs at least 10 bits (got {})", bits));
    }
    let cfg = MarklogConfig::from_env();
    let optimal = optimal_hash_count(bits, keys);
    let k = hashes.or(cfg.bloom_hash_count).unwrap_or(optimal);

    println!("bloom plan: bits={} keys={}", bits, keys);
    println!("  optimal k:        {}", optimal);
    println!("  using k:          {}", k);
    println!("  bits per key:     {:.2}", bits as f64 / keys.max(1) as f64);
    println!("  expected fp rate: {:.6}", error_rate_for(bits, keys, k as f64));
    if k != optimal {
        println!(
            "  rate at optimal k: {:.6}",
            error_rate_for(bits, keys, optimal as f64)
        );
    }
    Ok(())
}
