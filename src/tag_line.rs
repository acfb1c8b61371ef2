//! A single cache line's metadata: tag, resident address, valid and dirty bits.

/// Metadata for one resident (or empty) cache line.
///
/// Equality is by `tag` only; callers must additionally check [`TagLine::is_valid`]
/// before treating a tag match as a real hit, since an invalid line's `tag` is leftover
/// data from whatever used to occupy the slot.
#[derive(Clone, Copy, Debug, Default)]
pub struct TagLine {
    tag: u32,
    full_address: u32,
    valid: bool,
    dirty: bool,
}

impl TagLine {
    /// An empty line: invalid, clean, zeroed.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn tag(&self) -> u32 {
        self.tag
    }

    pub fn full_address(&self) -> u32 {
        self.full_address
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_valid(&mut self, state: bool) {
        self.valid = state;
    }

    pub fn set_dirty(&mut self, state: bool) {
        self.dirty = state;
    }

    /// Matches by tag bits only; gate with [`TagLine::is_valid`] at the call site.
    pub fn tag_matches(&self, tag: u32) -> bool {
        self.tag == tag
    }

    /// Installs a new residency: copies tag and full address, marks valid and clean.
    ///
    /// Any prior dirty state is discarded. The caller is responsible for snooping
    /// and writing back the old line before calling this.
    pub fn validate_and_insert(&mut self, tag: u32, full_address: u32) {
        self.tag = tag;
        self.full_address = full_address;
        self.valid = true;
        self.dirty = false;
    }
}
