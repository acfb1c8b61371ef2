//! One way of a cache level: a tag line per set.

use crate::tag_line::TagLine;

/// An ordered collection of tag lines, one per set, for a single way of a level.
#[derive(Clone, Debug)]
pub struct Way {
    tags: Vec<TagLine>,
}

impl Way {
    /// A fresh way with `sets` empty (invalid) lines.
    pub fn new(sets: usize) -> Self {
        Self {
            tags: vec![TagLine::empty(); sets],
        }
    }

    /// True iff the line at `set` is valid and carries `tag`.
    pub fn find_tag(&self, tag: u32, set: usize) -> bool {
        let line = &self.tags[set];
        line.is_valid() && line.tag_matches(tag)
    }

    /// Unconditionally overwrites the line at `set` with a fresh, clean residency.
    pub fn insert_tag(&mut self, tag: u32, full_address: u32, set: usize) {
        self.tags[set].validate_and_insert(tag, full_address);
    }

    pub fn check_set_valid(&self, set: usize) -> bool {
        self.tags[set].is_valid()
    }

    pub fn is_set_dirty(&self, set: usize) -> bool {
        self.tags[set].is_dirty()
    }

    pub fn set_dirt_status(&mut self, set: usize, status: bool) {
        self.tags[set].set_dirty(status);
    }

    pub fn set_valid_status(&mut self, set: usize, status: bool) {
        self.tags[set].set_valid(status);
    }

    pub fn get_full_address(&self, set: usize) -> u32 {
        self.tags[set].full_address()
    }
}
