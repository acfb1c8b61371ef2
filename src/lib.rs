//! Trace-driven simulator of a two-level inclusive write-back CPU data cache
//! hierarchy: L1 and L2 set-associative levels with LRU replacement, snoop
//! invalidation on L2 eviction, and write-allocate / no-write-allocate write-miss
//! policy.

pub mod cli;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod level;
pub mod lru;
pub mod tag_line;
pub mod trace;
pub mod way;
