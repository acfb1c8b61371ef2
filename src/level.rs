//! A full set-associative cache level: address decoding, lookup, victim selection,
//! and per-level statistics.

use crate::config::Layout;
use crate::lru::LruRegister;
use crate::way::Way;

/// One `(tag, set)` decoding of an address, plus the address itself.
#[derive(Clone, Copy, Debug)]
struct Decoded {
    tag: u32,
    set: usize,
    address: u32,
}

/// A set-associative cache level (L1 or L2): owns its ways and per-set LRU registers.
pub struct CacheLevel {
    layout: Layout,
    ways: Vec<Way>,
    lru: Vec<LruRegister>,
    accesses: u64,
    hits: u64,
    misses: u64,
}

impl CacheLevel {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            ways: (0..layout.ways).map(|_| Way::new(layout.sets)).collect(),
            lru: (0..layout.sets).map(|_| LruRegister::new(layout.ways)).collect(),
            accesses: 0,
            hits: 0,
            misses: 0,
        }
    }

    fn decode(&self, address: u32) -> Decoded {
        let tag = (address & self.layout.tag_mask) >> (32 - self.layout.tag_bits);
        let set = ((address & self.layout.set_mask) >> self.layout.block_size_log2) as usize;
        Decoded { tag, set, address }
    }

    /// Scans every way at `set` for a valid line matching `tag`; returns its way index.
    fn find_way(&self, tag: u32, set: usize) -> Option<usize> {
        self.ways.iter().position(|way| way.find_tag(tag, set))
    }

    fn first_invalid_way(&self, set: usize) -> Option<usize> {
        self.ways.iter().position(|way| !way.check_set_valid(set))
    }

    /// Probes for a read. Increments `accesses`, and `hits` or `misses` accordingly.
    /// A hit promotes the matching way in that set's LRU.
    pub fn find_and_read_data(&mut self, address: u32) -> bool {
        let decoded = self.decode(address);
        self.accesses += 1;
        match self.find_way(decoded.tag, decoded.set) {
            Some(way) => {
                self.hits += 1;
                self.lru[decoded.set].touch(way);
                true
            }
            None => {
                self.misses += 1;
                false
            }
        }
    }

    /// Probes for a write. On a hit, marks the line dirty and promotes it in the LRU.
    /// Does not itself allocate on a miss.
    pub fn find_and_write_data(&mut self, address: u32) -> bool {
        let decoded = self.decode(address);
        self.accesses += 1;
        match self.find_way(decoded.tag, decoded.set) {
            Some(way) => {
                self.ways[way].set_dirt_status(decoded.set, true);
                self.hits += 1;
                self.lru[decoded.set].touch(way);
                true
            }
            None => {
                self.misses += 1;
                false
            }
        }
    }

    /// Returns the address that would be evicted to make room for `address`, or
    /// `address` itself as a sentinel meaning "an invalid slot is free, nothing is
    /// really evicted". Does not mutate any state.
    pub fn find_victim(&self, address: u32) -> u32 {
        let decoded = self.decode(address);
        match self.first_invalid_way(decoded.set) {
            Some(_) => address,
            None => {
                let way = self.lru[decoded.set].least_recently_used();
                self.ways[way].get_full_address(decoded.set)
            }
        }
    }

    /// True iff the line resident at `victim_address` is dirty. False if no line at
    /// that (tag, set) is currently resident (including the "empty slot" sentinel).
    pub fn is_victim_dirty(&self, victim_address: u32) -> bool {
        let decoded = self.decode(victim_address);
        match self.find_way(decoded.tag, decoded.set) {
            Some(way) => self.ways[way].is_set_dirty(decoded.set),
            None => false,
        }
    }

    /// Clears the valid bit of the line matching `victim_address`, if present. A
    /// silent no-op when the sentinel "no eviction" address is passed, since nothing
    /// resides there under that tag.
    pub fn invalidate_victim(&mut self, victim_address: u32) {
        let decoded = self.decode(victim_address);
        if let Some(way) = self.find_way(decoded.tag, decoded.set) {
            self.ways[way].set_valid_status(decoded.set, false);
        }
    }

    /// Sets the dirty bit of the line matching `victim_address`, if present, and
    /// promotes that way in the LRU: a write-back into this level is a use of it.
    pub fn dirtify_victim(&mut self, victim_address: u32) {
        let decoded = self.decode(victim_address);
        if let Some(way) = self.find_way(decoded.tag, decoded.set) {
            self.ways[way].set_dirt_status(decoded.set, true);
            self.lru[decoded.set].touch(way);
        }
    }

    /// Installs `address` into the first invalid way of its set, clean, and promotes
    /// it in the LRU. Panics if no invalid way exists; the caller is responsible for
    /// running the snoop/invalidation sequence first.
    pub fn insert_new_data(&mut self, address: u32) {
        let decoded = self.decode(address);
        let way = self
            .first_invalid_way(decoded.set)
            .expect("insert_new_data called with no invalid way available");
        self.ways[way].insert_tag(decoded.tag, decoded.address, decoded.set);
        self.lru[decoded.set].touch(way);
    }

    /// As [`CacheLevel::insert_new_data`], then marks the freshly installed line dirty.
    pub fn insert_dirty_new_data(&mut self, address: u32) {
        self.insert_new_data(address);
        let decoded = self.decode(address);
        let way = self
            .find_way(decoded.tag, decoded.set)
            .expect("just-inserted line must be findable");
        self.ways[way].set_dirt_status(decoded.set, true);
    }

    /// True iff `address` currently resides in this level (used for inclusion checks
    /// in tests, not on the hot path).
    pub fn contains(&self, address: u32) -> bool {
        let decoded = self.decode(address);
        self.find_way(decoded.tag, decoded.set).is_some()
    }

    pub fn accesses(&self) -> u64 {
        self.accesses
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn miss_rate(&self) -> f64 {
        self.misses as f64 / self.accesses as f64
    }

    #[cfg(test)]
    pub(crate) fn lru_registers_valid(&self) -> bool {
        self.lru.iter().all(LruRegister::is_valid_permutation)
    }
}
