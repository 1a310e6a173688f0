use std::collections::BTreeMap;

use crate::{Frame, Page};

/// One page-table slot. Entries are retained after invalidation, so the
/// table remembers every page it has ever mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTableEntry {
    pub valid: bool,
    pub frame: Frame,
}

/// Authoritative page -> frame map with explicit validity.
#[derive(Debug, Default)]
pub struct PageTable {
    entries: BTreeMap<Page, PageTableEntry>,
}

impl PageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `page` to `frame` and mark the entry valid.
    pub fn insert(&mut self, page: Page, frame: Frame) {
        let entry = self
            .entries
            .entry(page)
            .or_insert(PageTableEntry { valid: false, frame });
        entry.valid = true;
        entry.frame = frame;
    }

    /// Invalidate the mapping for `page`. The entry itself is retained.
    pub fn remove(&mut self, page: Page) {
        if let Some(entry) = self.entries.get_mut(&page) {
            entry.valid = false;
        }
    }

    /// Frame holding `page`, if the mapping is valid.
    pub fn frame_of(&self, page: Page) -> Option<Frame> {
        self.entries
            .get(&page)
            .filter(|entry| entry.valid)
            .map(|entry| entry.frame)
    }

    /// All valid (page, frame) pairs, in ascending page order.
    pub fn valid_mappings(&self) -> Vec<(Page, Frame)> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.valid)
            .map(|(&page, entry)| (page, entry.frame))
            .collect()
    }

    /// Number of currently valid mappings.
    pub fn valid_count(&self) -> usize {
        self.entries.values().filter(|entry| entry.valid).count()
    }
}
