use log::trace;

use crate::recency::RecencyMap;
use crate::{Frame, Page};

/// Translation lookaside buffer: a bounded page -> frame cache with strict
/// LRU replacement and hit/miss accounting.
pub struct Tlb {
    capacity: usize,
    entries: RecencyMap<Page, Frame>,
    hits: u64,
    misses: u64,
}

impl Tlb {
    pub fn new(capacity: usize) -> Self {
        Tlb {
            capacity,
            entries: RecencyMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up the frame cached for `page`.
    ///
    /// A hit promotes the entry to most-recently-used; a miss changes
    /// nothing besides the miss counter.
    pub fn lookup(&mut self, page: Page) -> Option<Frame> {
        match self.entries.get(page).copied() {
            Some(frame) => {
                self.hits += 1;
                self.entries.touch(page);
                trace!("TLB hit: page {page} -> frame {frame}");
                Some(frame)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Cache a page -> frame mapping.
    ///
    /// An already-cached page is only promoted; otherwise the
    /// least-recently-used entry makes room when the cache is full.
    pub fn insert(&mut self, page: Page, frame: Frame) {
        if self.entries.contains(page) {
            self.entries.touch(page);
            return;
        }
        if self.entries.len() >= self.capacity {
            if let Some((evicted, _)) = self.entries.pop_oldest() {
                trace!("TLB evicts page {evicted}");
            }
        }
        self.entries.insert(page, frame);
    }

    /// Drop the entry for `page`, if any. Counters are untouched.
    pub fn remove(&mut self, page: Page) {
        self.entries.remove(page);
    }

    /// Drop all entries and zero both counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Cached (page, frame) pairs from least- to most-recently used.
    pub fn entries(&self) -> Vec<(Page, Frame)> {
        self.entries
            .iter_oldest_first()
            .map(|(page, &frame)| (page, frame))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_counts_hits_and_misses() {
        let mut tlb = Tlb::new(4);
        tlb.insert(1, 0);

        assert_eq!(tlb.lookup(1), Some(0));
        assert_eq!(tlb.lookup(2), None);
        assert_eq!(tlb.lookup(1), Some(0));

        assert_eq!(tlb.hits(), 2);
        assert_eq!(tlb.misses(), 1);
    }

    #[test]
    fn test_miss_does_not_mutate_entries() {
        let mut tlb = Tlb::new(2);
        tlb.insert(1, 0);
        tlb.insert(2, 1);

        assert_eq!(tlb.lookup(9), None);
        assert_eq!(tlb.entries(), vec![(1, 0), (2, 1)]);
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        // Inserting size + 1 distinct pages leaves exactly size entries,
        // with the least recently accessed one gone.
        let mut tlb = Tlb::new(3);
        tlb.insert(1, 0);
        tlb.insert(2, 1);
        tlb.insert(3, 2);
        tlb.insert(4, 3);

        assert_eq!(tlb.len(), 3);
        assert_eq!(tlb.entries(), vec![(2, 1), (3, 2), (4, 3)]);
        assert_eq!(tlb.lookup(1), None);
    }

    #[test]
    fn test_lookup_promotion_changes_eviction_order() {
        let mut tlb = Tlb::new(3);
        tlb.insert(1, 0);
        tlb.insert(2, 1);
        tlb.insert(3, 2);

        // Page 1 becomes most recent, so page 2 is now the LRU entry
        assert_eq!(tlb.lookup(1), Some(0));
        tlb.insert(4, 3);

        assert_eq!(tlb.entries(), vec![(3, 2), (1, 0), (4, 3)]);
    }

    #[test]
    fn test_insert_existing_promotes_without_rewriting() {
        let mut tlb = Tlb::new(3);
        tlb.insert(1, 0);
        tlb.insert(2, 1);
        tlb.insert(1, 7);

        assert_eq!(tlb.entries(), vec![(2, 1), (1, 0)]);
        assert_eq!(tlb.len(), 2);
    }

    #[test]
    fn test_remove_keeps_counters() {
        let mut tlb = Tlb::new(2);
        tlb.insert(1, 0);
        assert_eq!(tlb.lookup(1), Some(0));

        tlb.remove(1);
        assert!(tlb.is_empty());
        assert_eq!(tlb.hits(), 1);
        assert_eq!(tlb.misses(), 0);

        // Removing an absent page is a no-op
        tlb.remove(1);
        assert!(tlb.is_empty());
    }

    #[test]
    fn test_clear_zeroes_counters() {
        let mut tlb = Tlb::new(2);
        tlb.insert(1, 0);
        tlb.lookup(1);
        tlb.lookup(2);

        tlb.clear();
        assert!(tlb.is_empty());
        assert_eq!(tlb.hits(), 0);
        assert_eq!(tlb.misses(), 0);
        assert_eq!(tlb.capacity(), 2);
    }
}
