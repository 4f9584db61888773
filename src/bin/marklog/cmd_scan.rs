use anyhow::{Context, Result};
use std::path::PathBuf;

use marklog::{scan_segment, MarklogConfig};

pub fn exec(path: PathBuf, json: bool, no_crc: bool, strict_ticks: bool) -> Result<()> {
    let mut cfg = MarklogConfig::from_env();
    if no_crc {
        cfg = cfg.with_verify_crc(false);
    }
    if strict_ticks {
        cfg = cfg.with_strict_ticks(true);
    }

    let bytes = std::fs::read(&path).with_context(|| format!("read segment {}", path.display()))?;
    let report = scan_segment(&bytes, &cfg, |_, _| {});

    if json {
        let s = serde_json::to_string_pretty(&report).context("serialize scan report")?;
        println!("{}", s);
        return Ok(());
    }

    println!("segment: {} ({} bytes)", path.display(), bytes.len());
    println!("  markers:    {}", report.markers);
    for (name, n) in &report.per_type {
        println!("    {:<24} {}", name, n);
    }
    match report.last_tick {
        Some(t) => println!("  last tick:  {}", t),
        None => println!("  last tick:  -"),
    }
    println!("  valid end:  {}", report.valid_end);
    println!("  stop:       {:?} at {}", report.stop, report.stop_offset);
    if !report.tick_issues.is_empty() {
        println!("  tick regressions: {}", report.tick_issues.len());
        for t in &report.tick_issues {
            println!("    off={} tick={} after {}", t.offset, t.tick, t.previous);
        }
    }
    println!("  clean:      {}", report.is_clean());
    Ok(())
}
