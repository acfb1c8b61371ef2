//! Trace-file tokenization: one `{r|w} 0xADDRESS` reference per line.

use std::fs;
use std::path::Path;

use crate::error::SimError;

/// The operation a trace line requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

impl Operation {
    fn parse(token: &str, line: usize) -> Result<Self, SimError> {
        match token {
            "r" => Ok(Operation::Read),
            "w" => Ok(Operation::Write),
            other => Err(SimError::UnknownOperation {
                line,
                op: other.to_string(),
            }),
        }
    }
}

/// One tokenized trace line.
#[derive(Clone, Copy, Debug)]
pub struct TraceEntry {
    pub operation: Operation,
    pub address: u32,
}

fn parse_address(token: &str, line: usize, text: &str) -> Result<u32, SimError> {
    let hex = token.strip_prefix("0x").ok_or_else(|| SimError::MalformedTrace {
        line,
        text: text.to_string(),
    })?;
    u32::from_str_radix(hex, 16).map_err(|_| SimError::MalformedTrace {
        line,
        text: text.to_string(),
    })
}

fn parse_line(line_no: usize, text: &str) -> Result<TraceEntry, SimError> {
    let mut tokens = text.split_whitespace();
    let op_token = tokens.next().ok_or_else(|| SimError::MalformedTrace {
        line: line_no,
        text: text.to_string(),
    })?;
    let addr_token = tokens.next().ok_or_else(|| SimError::MalformedTrace {
        line: line_no,
        text: text.to_string(),
    })?;
    // Anything after the address token is silently ignored, matching the original
    // `ss >> operation >> address` extraction, which never inspects what follows.

    let operation = Operation::parse(op_token, line_no)?;
    let address = parse_address(addr_token, line_no, text)?;
    Ok(TraceEntry { operation, address })
}

/// Reads and tokenizes an entire trace file, buffering it into memory.
///
/// Blank or malformed lines are reported as [`SimError::MalformedTrace`] with the
/// 1-indexed line number, matching the original's "Command Format error" behavior but
/// with a line number attached for easier diagnosis.
pub fn read_trace(path: &Path) -> Result<Vec<TraceEntry>, SimError> {
    let contents = fs::read_to_string(path)?;
    contents
        .lines()
        .enumerate()
        .map(|(index, line)| parse_line(index + 1, line))
        .collect()
}
