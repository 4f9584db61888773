use anyhow::Result;
use env_logger::{Builder, Env};
use log::error;

mod cli;
mod cmd_bloom;
mod cmd_dump;
mod cmd_hash;
mod cmd_scan;

fn init_logger() {
    // RUST_LOG overrides, default is info.
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse_args();
    match cli.cmd {
        cli::Cmd::Scan { path, json, no_crc, strict_ticks } =>
            cmd_scan::exec(path, json, no_crc, strict_ticks),

        cli::Cmd::Dump { path, limit, json } =>
            cmd_dump::exec(path, limit, json),

        cli::Cmd::Hash { algo, text, file } =>
            cmd_hash::exec(algo, text, file),

        cli::Cmd::BloomPlan { bits, keys, hashes } =>
            cmd_bloom::exec(bits, keys, hashes),
    }
}
