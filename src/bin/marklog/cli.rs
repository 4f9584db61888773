use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// marklog CLI (segment scan/dump, hashing, Bloom sizing)
#[derive(Parser, Debug)]
#[command(name = "marklog", version, about = "Marker log inspection tool", arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum HashAlgo {
    /// FNV-1a 64
    Fnv,
    /// CRC-32 (IEEE)
    Crc,
    /// xxh64, seed 0
    Xxh,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Recovery scan of a segment file: counts, last tick, stop reason, truncation point
    Scan {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        json: bool,
        /// Skip CRC verification (overrides MARKLOG_VERIFY_CRC)
        #[arg(long)]
        no_crc: bool,
        /// Stop at the first tick regression (overrides MARKLOG_STRICT_TICKS)
        #[arg(long)]
        strict_ticks: bool,
    },
    /// List markers of a segment file with their typed fields
    Dump {
        #[arg(long)]
        path: PathBuf,
        /// Print at most N markers
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Hash a string or a file
    Hash {
        #[arg(value_enum)]
        algo: HashAlgo,
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Hash count and expected false-positive rate for a Bloom filter sizing
    BloomPlan {
        #[arg(long)]
        bits: usize,
        #[arg(long)]
        keys: usize,
        /// Explicit hash count (overrides MARKLOG_BLOOM_HASHES and the optimum)
        #[arg(long)]
        hashes: Option<usize>,
    },
}
