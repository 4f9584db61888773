use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

use marklog::{crc32, fast_hash, fnv1a};

use crate::cli::HashAlgo;

pub fn exec(algo: HashAlgo, text: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let data = match (text, file) {
        (Some(t), None) => t.into_bytes(),
        (None, Some(p)) => std::fs::read(&p).with_context(|| format!("read {}", p.display()))?,
        _ => return Err(anyhow!("exactly one of --text or --file is required")),
    };

    match algo {
        HashAlgo::Fnv => println!("fnv1a64 {:016x}", fnv1a(&data)),
        HashAlgo::Crc => println!("crc32 {:08x}", crc32(&data)),
        HashAlgo::Xxh => println!("xxh64 {:016x}", fast_hash(&data)),
    }
    Ok(())
}
