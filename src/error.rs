//! Crate-wide error taxonomy.

use thiserror::Error;

/// A rejected combination of configuration parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `size_log2 < assoc_log2 + block_size_log2`: fewer bytes than one way's worth
    /// of lines, which would make `sets == 0`.
    #[error("{level} size (2^{size_log2} bytes) is too small for its associativity (2^{assoc_log2} ways) and block size (2^{block_size_log2} bytes)")]
    LevelTooSmall {
        level: &'static str,
        size_log2: u32,
        assoc_log2: u32,
        block_size_log2: u32,
    },

    /// `sets` derived from the log2 parameters was not itself a power of two.
    #[error("{level} derived set count {sets} is not a power of two")]
    NonPowerOfTwoSets { level: &'static str, sets: u64 },

    /// The derived tag width fell outside `1..=32` bits.
    #[error("{level} derived tag width {tag_bits} is out of range 1..=32")]
    TagBitsOutOfRange { level: &'static str, tag_bits: i64 },
}

/// Errors that can terminate a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error reading trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("Command Format error")]
    MalformedTrace { line: usize, text: String },

    #[error("Command Format error")]
    UnknownOperation { line: usize, op: String },

    #[error("trace contained no references; metrics are undefined")]
    EmptyTrace,
}
