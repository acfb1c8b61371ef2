//! The hierarchy controller: orchestrates L1 and L2 for each reference, applies the
//! write-allocate policy, and performs inclusion-preserving snoop invalidation.

use crate::config::Config;
use crate::error::SimError;
use crate::level::CacheLevel;

/// Final, printable metrics for a completed simulation run.
#[derive(Clone, Copy, Debug)]
pub struct Metrics {
    pub l1_miss_rate: f64,
    pub l2_miss_rate: f64,
    pub avg_access_time: f64,
}

/// Owns L1 and L2 and the cross-level bookkeeping (total cycles, total references).
/// Only this type has visibility across both levels.
pub struct Hierarchy {
    l1: CacheLevel,
    l2: CacheLevel,
    mem_cycles: u32,
    l1_cycles: u32,
    l2_cycles: u32,
    write_allocate: bool,
    total_access_cycles: u64,
    total_references: u64,
}

impl Hierarchy {
    pub fn new(config: &Config) -> Result<Self, SimError> {
        let (l1_layout, l2_layout) = config.validate()?;
        Ok(Self {
            l1: CacheLevel::new(l1_layout),
            l2: CacheLevel::new(l2_layout),
            mem_cycles: config.mem_cycles,
            l1_cycles: config.l1.cycles,
            l2_cycles: config.l2.cycles,
            write_allocate: config.write_allocate,
            total_access_cycles: 0,
            total_references: 0,
        })
    }

    /// The sub-protocol that runs on an L2 miss: snoops L1 for a dirty copy of the
    /// evicted L2 line, invalidates it in L1 to preserve inclusion, drops it from L2,
    /// then installs the new line into L2.
    fn install_into_l2(&mut self, address: u32) {
        let victim = self.l2.find_victim(address);
        if self.l1.is_victim_dirty(victim) {
            self.l2.dirtify_victim(victim);
        }
        self.l1.invalidate_victim(victim);
        self.l2.invalidate_victim(victim);
        self.l2.insert_new_data(address);
        log::debug!("L2 install of {address:#010x} (victim {victim:#010x})");
    }

    /// Installs `address` into L1, propagating a dirty eviction into L2 as a
    /// conceptual write-back first.
    fn install_into_l1(&mut self, address: u32, dirty: bool) {
        let victim = self.l1.find_victim(address);
        if self.l1.is_victim_dirty(victim) {
            self.l2.dirtify_victim(victim);
        }
        self.l1.invalidate_victim(victim);
        if dirty {
            self.l1.insert_dirty_new_data(address);
        } else {
            self.l1.insert_new_data(address);
        }
        log::debug!("L1 install of {address:#010x} (victim {victim:#010x}, dirty={dirty})");
    }

    /// Services one read reference.
    pub fn read(&mut self, address: u32) {
        log::trace!("read {address:#010x}");
        self.total_references += 1;
        self.total_access_cycles += self.l1_cycles as u64;

        if self.l1.find_and_read_data(address) {
            return;
        }

        self.total_access_cycles += self.l2_cycles as u64;
        if !self.l2.find_and_read_data(address) {
            self.total_access_cycles += self.mem_cycles as u64;
            self.install_into_l2(address);
        }

        self.install_into_l1(address, false);
    }

    /// Services one write reference, dispatching to the configured write-miss policy.
    pub fn write(&mut self, address: u32) {
        log::trace!("write {address:#010x}");
        if self.write_allocate {
            self.write_allocate_path(address);
        } else {
            self.no_write_allocate_path(address);
        }
    }

    fn write_allocate_path(&mut self, address: u32) {
        self.total_references += 1;
        self.total_access_cycles += self.l1_cycles as u64;

        if self.l1.find_and_write_data(address) {
            return;
        }

        self.total_access_cycles += self.l2_cycles as u64;
        // Treated as a read-for-ownership probe: updates L2's access/hit counters
        // and LRU even though the triggering reference is a write. This is the
        // modelled (and preserved) behavior of the source this spec was distilled
        // from.
        if !self.l2.find_and_read_data(address) {
            self.total_access_cycles += self.mem_cycles as u64;
            self.install_into_l2(address);
        }

        self.install_into_l1(address, true);
    }

    fn no_write_allocate_path(&mut self, address: u32) {
        self.total_references += 1;
        self.total_access_cycles += self.l1_cycles as u64;

        if self.l1.find_and_write_data(address) {
            return;
        }

        self.total_access_cycles += self.l2_cycles as u64;
        if self.l2.find_and_write_data(address) {
            return;
        }

        self.total_access_cycles += self.mem_cycles as u64;
    }

    /// Dispatches a trace entry by operation kind.
    pub fn process(&mut self, operation: crate::trace::Operation, address: u32) {
        use crate::trace::Operation;
        match operation {
            Operation::Read => self.read(address),
            Operation::Write => self.write(address),
        }
    }

    /// Computes the final metrics. Fails with [`SimError::EmptyTrace`] if no
    /// reference was ever processed, since all three ratios would otherwise divide
    /// by zero.
    pub fn metrics(&self) -> Result<Metrics, SimError> {
        if self.total_references == 0 {
            return Err(SimError::EmptyTrace);
        }
        Ok(Metrics {
            l1_miss_rate: self.l1.miss_rate(),
            l2_miss_rate: self.l2.miss_rate(),
            avg_access_time: self.total_access_cycles as f64 / self.total_references as f64,
        })
    }

    pub fn l1(&self) -> &CacheLevel {
        &self.l1
    }

    pub fn l2(&self) -> &CacheLevel {
        &self.l2
    }

    pub fn total_references(&self) -> u64 {
        self.total_references
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheLevelConfig;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn scenario_config(l1_assoc: u32, l2_assoc: u32, write_allocate: bool) -> Config {
        Config {
            mem_cycles: 100,
            block_size_log2: 4,
            write_allocate,
            l1: CacheLevelConfig {
                size_log2: 6,
                assoc_log2: l1_assoc,
                cycles: 1,
                block_size_log2: 4,
            },
            l2: CacheLevelConfig {
                size_log2: 8,
                assoc_log2: l2_assoc,
                cycles: 5,
                block_size_log2: 4,
            },
        }
    }

    /// Replays a read/write reference (`is_write`, `address`) sequence against a
    /// fresh hierarchy and returns its final metrics.
    fn replay(config: Config, refs: &[(bool, u32)]) -> Metrics {
        let mut h = Hierarchy::new(&config).unwrap();
        for &(is_write, address) in refs {
            if is_write {
                h.write(address);
            } else {
                h.read(address);
            }
        }
        h.metrics().unwrap()
    }

    #[rstest]
    #[case::s1_cold_read_misses_both_levels(
        scenario_config(0, 1, true),
        &[(false, 0x00)],
        1.0, 1.0, 106.0,
    )]
    #[case::s2_second_identical_read_hits_l1(
        scenario_config(0, 1, true),
        &[(false, 0x00), (false, 0x00)],
        0.5, 1.0, 53.5,
    )]
    #[case::s4_write_allocate_then_read_hits_l1(
        scenario_config(0, 1, true),
        &[(true, 0x00), (false, 0x00)],
        0.5, 1.0, 53.5,
    )]
    #[case::s5_direct_mapped_four_sets_then_repeat(
        scenario_config(0, 1, true),
        &[(false, 0x00), (false, 0x10), (false, 0x20), (false, 0x30), (false, 0x00)],
        0.8, 1.0, 85.0,
    )]
    fn scenario_metrics_match_spec(
        #[case] config: Config,
        #[case] refs: &[(bool, u32)],
        #[case] expected_l1_miss: f64,
        #[case] expected_l2_miss: f64,
        #[case] expected_avg: f64,
    ) {
        let m = replay(config, refs);
        assert!((m.l1_miss_rate - expected_l1_miss).abs() < 1e-9);
        assert!((m.l2_miss_rate - expected_l2_miss).abs() < 1e-9);
        assert!((m.avg_access_time - expected_avg).abs() < 1e-9);
    }

    #[test]
    fn s3_no_write_allocate_misses_persist() {
        let config = scenario_config(0, 1, false);
        let mut h = Hierarchy::new(&config).unwrap();
        h.write(0);
        let m = h.metrics().unwrap();
        assert!((m.l1_miss_rate - 1.0).abs() < 1e-9);
        assert!((m.l2_miss_rate - 1.0).abs() < 1e-9);
        assert!((m.avg_access_time - 106.0).abs() < 1e-9);

        // A subsequent read still misses both levels: nothing was installed.
        h.read(0);
        assert_eq!(h.l1().accesses(), 2);
        assert_eq!(h.l1().misses(), 2);
    }

    #[test]
    fn s4_write_allocate_leaves_l1_line_dirty() {
        let config = scenario_config(0, 1, true);
        let mut h = Hierarchy::new(&config).unwrap();
        h.write(0);
        h.read(0);
        assert!(h.l1().is_victim_dirty(0));
    }

    #[test]
    fn s6_l2_eviction_invalidates_l1_copy() {
        // L1: 32 bytes, 2-way, 16-byte blocks => 1 set, 2 ways.
        // L2: 32 bytes, direct-mapped, 16-byte blocks => 2 sets, 1 way.
        let config = Config {
            mem_cycles: 100,
            block_size_log2: 4,
            write_allocate: true,
            l1: CacheLevelConfig {
                size_log2: 5,
                assoc_log2: 1,
                cycles: 1,
                block_size_log2: 4,
            },
            l2: CacheLevelConfig {
                size_log2: 5,
                assoc_log2: 0,
                cycles: 5,
                block_size_log2: 4,
            },
        };
        let mut h = Hierarchy::new(&config).unwrap();

        // Address 0x00 maps to L2 set 0 and resides in L1 too after this read.
        h.read(0x00);
        assert!(h.l1().contains(0x00));
        assert!(h.l2().contains(0x00));

        // Address 0x10 maps to L2 set 1 (different set, no conflict yet).
        h.read(0x10);

        // Address 0x20 maps to L2 set 0 again (stride of L2 set count * block size =
        // 2 * 16 = 32 bytes) and forces L2 to evict the line holding 0x00, since L2 is
        // direct-mapped with only one way per set.
        h.read(0x20);
        assert!(!h.l2().contains(0x00));
        assert!(!h.l1().contains(0x00));

        // A subsequent read of 0x00 must miss L1 (inclusion was preserved).
        let misses_before = h.l1().misses();
        h.read(0x00);
        assert_eq!(h.l1().misses(), misses_before + 1);
    }

    #[test]
    fn empty_trace_is_reported_as_error() {
        let config = scenario_config(0, 1, true);
        let h = Hierarchy::new(&config).unwrap();
        assert!(matches!(h.metrics(), Err(SimError::EmptyTrace)));
    }
}
