//! Command-line surface: the trace path plus the nine configuration flags.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{CacheLevelConfig, Config};

/// Trace-driven simulator of a two-level inclusive write-back CPU data cache
/// hierarchy.
#[derive(Parser, Debug)]
#[command(name = "cachesim", author, version, about)]
pub struct Cli {
    /// Path to the trace file (lines of `r|w 0xADDRESS`).
    pub trace_path: PathBuf,

    /// Main memory access latency, in cycles.
    #[arg(long = "mem-cyc")]
    pub mem_cycles: u32,

    /// Block size, as a power-of-two exponent (bytes = 2^value).
    #[arg(long = "bsize")]
    pub block_size_log2: u32,

    /// L1 total size, as a power-of-two exponent (bytes = 2^value).
    #[arg(long = "l1-size")]
    pub l1_size_log2: u32,

    /// L2 total size, as a power-of-two exponent (bytes = 2^value).
    #[arg(long = "l2-size")]
    pub l2_size_log2: u32,

    /// L1 associativity, as a power-of-two exponent (ways = 2^value).
    #[arg(long = "l1-assoc")]
    pub l1_assoc_log2: u32,

    /// L2 associativity, as a power-of-two exponent (ways = 2^value).
    #[arg(long = "l2-assoc")]
    pub l2_assoc_log2: u32,

    /// L1 access latency, in cycles.
    #[arg(long = "l1-cyc")]
    pub l1_cycles: u32,

    /// L2 access latency, in cycles.
    #[arg(long = "l2-cyc")]
    pub l2_cycles: u32,

    /// Write-allocate policy: 1 to allocate on a write miss, 0 otherwise.
    #[arg(long = "wr-alloc", value_parser = parse_bool_flag)]
    pub write_allocate: bool,
}

fn parse_bool_flag(raw: &str) -> Result<bool, String> {
    match raw {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(format!("expected 0 or 1, got {other}")),
    }
}

impl Cli {
    /// Builds the derived [`Config`] from the flat set of parsed flags.
    pub fn to_config(&self) -> Config {
        Config {
            mem_cycles: self.mem_cycles,
            block_size_log2: self.block_size_log2,
            write_allocate: self.write_allocate,
            l1: CacheLevelConfig {
                size_log2: self.l1_size_log2,
                assoc_log2: self.l1_assoc_log2,
                cycles: self.l1_cycles,
                block_size_log2: self.block_size_log2,
            },
            l2: CacheLevelConfig {
                size_log2: self.l2_size_log2,
                assoc_log2: self.l2_assoc_log2,
                cycles: self.l2_cycles,
                block_size_log2: self.block_size_log2,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["cachesim"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[test]
    fn parses_all_nine_flags_in_any_order() {
        let cli = parse(&[
            "trace.txt",
            "--l2-cyc",
            "5",
            "--mem-cyc",
            "100",
            "--bsize",
            "4",
            "--l1-size",
            "6",
            "--l2-size",
            "8",
            "--l1-assoc",
            "0",
            "--l2-assoc",
            "1",
            "--l1-cyc",
            "1",
            "--wr-alloc",
            "1",
        ]);
        assert_eq!(cli.trace_path, PathBuf::from("trace.txt"));
        assert_eq!(cli.mem_cycles, 100);
        assert!(cli.write_allocate);
        let config = cli.to_config();
        assert_eq!(config.l1.size_log2, 6);
        assert_eq!(config.l2.cycles, 5);
    }

    #[test]
    fn rejects_non_zero_one_write_allocate() {
        let result = Cli::try_parse_from([
            "cachesim",
            "trace.txt",
            "--mem-cyc",
            "1",
            "--bsize",
            "4",
            "--l1-size",
            "6",
            "--l2-size",
            "8",
            "--l1-assoc",
            "0",
            "--l2-assoc",
            "1",
            "--l1-cyc",
            "1",
            "--l2-cyc",
            "5",
            "--wr-alloc",
            "2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_flag_is_rejected() {
        let result = Cli::try_parse_from(["cachesim", "trace.txt", "--mem-cyc", "1"]);
        assert!(result.is_err());
    }
}
