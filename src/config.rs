//! Centralized configuration for marklog readers/scanners.
//!
//! - MarklogConfig::from_env() reads MARKLOG_* variables on top of the defaults.
//! - Fluent with_* setters override single fields (builder style), build() finishes.
//!
//! Env:
//! - MARKLOG_VERIFY_CRC      = 0|1|true|false|on|off|yes|no (default true)
//! - MARKLOG_STRICT_TICKS    = same (default false)
//! - MARKLOG_MAX_MARKER_SIZE = bytes (default 256 MiB)
//! - MARKLOG_BLOOM_HASHES    = k (default: derived from bits/keys)

use std::fmt;

use log::warn;

pub const DEFAULT_MAX_MARKER_SIZE: u64 = 256 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarklogConfig {
    /// Check the CRC of every marker while scanning a segment.
    pub verify_crc: bool,

    /// Stop a scan at the first tick regression (otherwise it is only reported).
    pub strict_ticks: bool,

    /// Markers declaring more bytes than this are treated as malformed.
    pub max_marker_size: u64,

    /// Explicit Bloom hash function count; None = optimal for the sizing.
    pub bloom_hash_count: Option<usize>,
}

impl Default for MarklogConfig {
    fn default() -> Self {
        Self {
            verify_crc: true,
            strict_ticks: false,
            max_marker_size: DEFAULT_MAX_MARKER_SIZE,
            bloom_hash_count: None,
        }
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

impl MarklogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as from_env() with an arbitrary variable source (tests, embedding apps).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("MARKLOG_VERIFY_CRC") {
            match parse_flag(&v) {
                Some(on) => cfg.verify_crc = on,
                None => warn!("MARKLOG_VERIFY_CRC: ignoring unrecognized value {:?}", v),
            }
        }

        if let Some(v) = lookup("MARKLOG_STRICT_TICKS") {
            match parse_flag(&v) {
                Some(on) => cfg.strict_ticks = on,
                None => warn!("MARKLOG_STRICT_TICKS: ignoring unrecognized value {:?}", v),
            }
        }

        if let Some(v) = lookup("MARKLOG_MAX_MARKER_SIZE") {
            match v.trim().parse::<u64>() {
                Ok(n) if n > 0 => cfg.max_marker_size = n,
                _ => warn!("MARKLOG_MAX_MARKER_SIZE: ignoring invalid value {:?}", v),
            }
        }

        if let Some(v) = lookup("MARKLOG_BLOOM_HASHES") {
            match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => cfg.bloom_hash_count = Some(n),
                _ => warn!("MARKLOG_BLOOM_HASHES: ignoring invalid value {:?}", v),
            }
        }

        cfg
    }

    pub fn with_verify_crc(mut self, on: bool) -> Self {
        self.verify_crc = on;
        self
    }

    pub fn with_strict_ticks(mut self, on: bool) -> Self {
        self.strict_ticks = on;
        self
    }

    pub fn with_max_marker_size(mut self, bytes: u64) -> Self {
        self.max_marker_size = bytes;
        self
    }

    pub fn with_bloom_hash_count(mut self, k: Option<usize>) -> Self {
        self.bloom_hash_count = k;
        self
    }

    pub fn build(self) -> Self {
        self
    }
}

impl fmt::Display for MarklogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MarklogConfig {{ verify_crc: {}, strict_ticks: {}, max_marker_size: {}, bloom_hash_count: {} }}",
            self.verify_crc,
            self.strict_ticks,
            self.max_marker_size,
            self.bloom_hash_count
                .map(|k| k.to_string())
                .unwrap_or_else(|| "optimal".to_string()),
        )
    }
}
