//! Page replacement: FIFO, LRU, LFU and Optimal behind one interface.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::Page;
use crate::recency::RecencyMap;

/// Replacement algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Algorithm {
    /// Evict the page resident longest.
    FIFO,
    /// Evict the page unused longest.
    #[default]
    LRU,
    /// Evict the page accessed least often.
    LFU,
    /// Evict the page referenced farthest in the future (needs the full
    /// upcoming reference sequence).
    Optimal,
}

impl Algorithm {
    /// Human-readable description for display surfaces.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::FIFO => "First-In First-Out - evicts the oldest resident page",
            Self::LRU => "Least Recently Used - evicts the page unused longest",
            Self::LFU => "Least Frequently Used - evicts the least accessed page",
            Self::Optimal => "Optimal - evicts the page referenced farthest in the future",
        }
    }

    /// Select an algorithm by name (case-insensitive, "OPT" accepted for
    /// Optimal). Unrecognized names select LRU; that is the documented
    /// default, not an error.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "FIFO" => Self::FIFO,
            "LFU" => Self::LFU,
            "OPT" | "OPTIMAL" => Self::Optimal,
            _ => Self::LRU,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::FIFO => "FIFO",
            Self::LRU => "LRU",
            Self::LFU => "LFU",
            Self::Optimal => "Optimal",
        };
        f.write_str(name)
    }
}

/// A replacement policy tracks the resident set up to a fixed capacity.
///
/// `access(page)` returns `(victim, fault)`. A page already tracked is not a
/// fault; the call only updates the variant's bookkeeping. An untracked page
/// is a fault: it joins the resident set, and a victim is chosen and
/// returned only when the set was already at capacity.
pub enum Replacer {
    FIFO(FifoReplacer),
    LRU(LruReplacer),
    LFU(LfuReplacer),
    Optimal(OptimalReplacer),
}

impl Replacer {
    /// Build the policy selected by `algorithm`. The future reference
    /// sequence is consumed by Optimal and ignored by the rest.
    pub fn new(algorithm: Algorithm, capacity: usize, future: &[Page]) -> Self {
        match algorithm {
            Algorithm::FIFO => Self::FIFO(FifoReplacer::new(capacity)),
            Algorithm::LRU => Self::LRU(LruReplacer::new(capacity)),
            Algorithm::LFU => Self::LFU(LfuReplacer::new(capacity)),
            Algorithm::Optimal => Self::Optimal(OptimalReplacer::new(capacity, future)),
        }
    }

    pub fn access(&mut self, page: Page) -> (Option<Page>, bool) {
        match self {
            Self::FIFO(replacer) => replacer.access(page),
            Self::LRU(replacer) => replacer.access(page),
            Self::LFU(replacer) => replacer.access(page),
            Self::Optimal(replacer) => replacer.access(page),
        }
    }
}

/// FIFO: resident pages ordered by insertion time; the oldest is evicted.
pub struct FifoReplacer {
    capacity: usize,
    queue: VecDeque<Page>,
}

impl FifoReplacer {
    pub fn new(capacity: usize) -> Self {
        FifoReplacer {
            capacity,
            queue: VecDeque::new(),
        }
    }

    pub fn access(&mut self, page: Page) -> (Option<Page>, bool) {
        if self.queue.contains(&page) {
            return (None, false);
        }
        let victim = if self.queue.len() >= self.capacity {
            self.queue.pop_front()
        } else {
            None
        };
        self.queue.push_back(page);
        (victim, true)
    }
}

/// LRU: every access, hit or fault, promotes the page; the least recently
/// accessed page is evicted.
pub struct LruReplacer {
    capacity: usize,
    resident: RecencyMap<Page, ()>,
}

impl LruReplacer {
    pub fn new(capacity: usize) -> Self {
        LruReplacer {
            capacity,
            resident: RecencyMap::new(),
        }
    }

    pub fn access(&mut self, page: Page) -> (Option<Page>, bool) {
        if self.resident.touch(page) {
            return (None, false);
        }
        let victim = if self.resident.len() >= self.capacity {
            self.resident.pop_oldest().map(|(victim, ())| victim)
        } else {
            None
        };
        self.resident.insert(page, ());
        (victim, true)
    }
}

/// LFU: per-page access counts, incremented on every access. The minimum
/// count is evicted; ties keep the page inserted earliest.
pub struct LfuReplacer {
    capacity: usize,
    resident: Vec<Page>,
    frequency: HashMap<Page, u64>,
}

impl LfuReplacer {
    pub fn new(capacity: usize) -> Self {
        LfuReplacer {
            capacity,
            resident: Vec::new(),
            frequency: HashMap::new(),
        }
    }

    pub fn access(&mut self, page: Page) -> (Option<Page>, bool) {
        if self.resident.contains(&page) {
            if let Some(count) = self.frequency.get_mut(&page) {
                *count += 1;
            }
            return (None, false);
        }
        let victim = if self.resident.len() >= self.capacity {
            self.evict_least_frequent()
        } else {
            None
        };
        self.resident.push(page);
        self.frequency.insert(page, 1);
        (victim, true)
    }

    fn evict_least_frequent(&mut self) -> Option<Page> {
        let mut best: Option<(usize, Page, u64)> = None;
        for (index, &page) in self.resident.iter().enumerate() {
            let count = self.frequency.get(&page).copied().unwrap_or(0);
            // Strict < keeps the earliest-inserted page on ties
            if best.is_none_or(|(_, _, minimum)| count < minimum) {
                best = Some((index, page, count));
            }
        }
        let (index, victim, _) = best?;
        self.resident.remove(index);
        self.frequency.remove(&victim);
        Some(victim)
    }
}

/// Optimal (Belady): evicts the resident page whose next reference lies
/// farthest in the future, preferring pages never referenced again.
pub struct OptimalReplacer {
    capacity: usize,
    resident: Vec<Page>,
    future: Vec<Page>,
    cursor: usize,
}

impl OptimalReplacer {
    pub fn new(capacity: usize, future: &[Page]) -> Self {
        OptimalReplacer {
            capacity,
            resident: Vec::new(),
            future: future.to_vec(),
            cursor: 0,
        }
    }

    pub fn access(&mut self, page: Page) -> (Option<Page>, bool) {
        if self.resident.contains(&page) {
            self.cursor += 1;
            return (None, false);
        }
        let victim = if self.resident.len() >= self.capacity {
            let victim = self.select_victim();
            if let Some(victim) = victim {
                self.resident.retain(|&resident| resident != victim);
            }
            victim
        } else {
            None
        };
        self.resident.push(page);
        self.cursor += 1;
        (victim, true)
    }

    /// Pick the resident page with the farthest next use after the cursor.
    ///
    /// A page with no future use at all is taken immediately; distance ties
    /// keep the first page encountered in residency order.
    fn select_victim(&self) -> Option<Page> {
        let start = (self.cursor + 1).min(self.future.len());
        let window = &self.future[start..];

        let mut farthest: Option<(Page, usize)> = None;
        for &page in &self.resident {
            let Some(next_use) = window.iter().position(|&upcoming| upcoming == page) else {
                return Some(page);
            };
            if farthest.is_none_or(|(_, distance)| next_use > distance) {
                farthest = Some((page, next_use));
            }
        }
        farthest
            .map(|(page, _)| page)
            .or_else(|| self.resident.first().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(replacer: &mut Replacer, refs: &[Page]) -> (Vec<Page>, usize) {
        let mut victims = Vec::new();
        let mut faults = 0;
        for &page in refs {
            let (victim, fault) = replacer.access(page);
            if fault {
                faults += 1;
            }
            victims.extend(victim);
        }
        (victims, faults)
    }

    #[test]
    fn test_algorithm_from_name() {
        assert_eq!(Algorithm::from_name("FIFO"), Algorithm::FIFO);
        assert_eq!(Algorithm::from_name("lfu"), Algorithm::LFU);
        assert_eq!(Algorithm::from_name("opt"), Algorithm::Optimal);
        assert_eq!(Algorithm::from_name("Optimal"), Algorithm::Optimal);
        // Unknown names fall back to the LRU default
        assert_eq!(Algorithm::from_name("second-chance"), Algorithm::LRU);
        assert_eq!(Algorithm::from_name(""), Algorithm::LRU);
        assert_eq!(Algorithm::default(), Algorithm::LRU);
    }

    #[test]
    fn test_fault_below_capacity_has_no_victim() {
        for algorithm in [
            Algorithm::FIFO,
            Algorithm::LRU,
            Algorithm::LFU,
            Algorithm::Optimal,
        ] {
            let mut replacer = Replacer::new(algorithm, 3, &[1, 2, 3]);
            assert_eq!(replacer.access(1), (None, true), "{algorithm}");
            assert_eq!(replacer.access(2), (None, true), "{algorithm}");
            assert_eq!(replacer.access(3), (None, true), "{algorithm}");
        }
    }

    #[test]
    fn test_tracked_page_is_not_a_fault() {
        for algorithm in [
            Algorithm::FIFO,
            Algorithm::LRU,
            Algorithm::LFU,
            Algorithm::Optimal,
        ] {
            let mut replacer = Replacer::new(algorithm, 2, &[1, 1]);
            replacer.access(1);
            assert_eq!(replacer.access(1), (None, false), "{algorithm}");
        }
    }

    #[test]
    fn test_fifo_evicts_in_insertion_order() {
        let mut replacer = Replacer::new(Algorithm::FIFO, 3, &[]);
        let (victims, faults) = run(&mut replacer, &[1, 2, 3, 4, 5, 6]);
        assert_eq!(victims, vec![1, 2, 3]);
        assert_eq!(faults, 6);
    }

    #[test]
    fn test_fifo_hit_does_not_reorder() {
        let mut replacer = Replacer::new(Algorithm::FIFO, 2, &[]);
        replacer.access(1);
        replacer.access(2);
        // Re-touching page 1 must not move it behind page 2
        assert_eq!(replacer.access(1), (None, false));
        assert_eq!(replacer.access(3), (Some(1), true));
    }

    #[test]
    fn test_lru_hit_promotes() {
        let mut replacer = Replacer::new(Algorithm::LRU, 2, &[]);
        replacer.access(1);
        replacer.access(2);
        replacer.access(1);
        // Page 2 is now least recent
        assert_eq!(replacer.access(3), (Some(2), true));
    }

    #[test]
    fn test_lru_evicts_least_recent_fault() {
        let mut replacer = Replacer::new(Algorithm::LRU, 3, &[]);
        let (victims, faults) = run(&mut replacer, &[1, 2, 3, 4, 1, 2]);
        // 4 evicts 1, then 1 evicts 2, then 2 evicts 3
        assert_eq!(victims, vec![1, 2, 3]);
        assert_eq!(faults, 6);
    }

    #[test]
    fn test_lfu_evicts_minimum_frequency() {
        let mut replacer = Replacer::new(Algorithm::LFU, 3, &[]);
        replacer.access(1);
        replacer.access(1);
        replacer.access(2);
        replacer.access(2);
        replacer.access(3);
        // Frequencies: 1 -> 2, 2 -> 2, 3 -> 1
        assert_eq!(replacer.access(4), (Some(3), true));
    }

    #[test]
    fn test_lfu_ties_break_by_insertion_order() {
        let mut replacer = Replacer::new(Algorithm::LFU, 3, &[]);
        replacer.access(1);
        replacer.access(1);
        replacer.access(2);
        replacer.access(3);
        // 2 and 3 both have frequency 1; 2 was inserted first
        assert_eq!(replacer.access(4), (Some(2), true));
        // The evicted page's counter is gone: re-inserting starts at 1
        assert_eq!(replacer.access(2), (Some(3), true));
    }

    #[test]
    fn test_lfu_victim_sequence_is_reproducible() {
        let refs = [4, 1, 4, 2, 3, 1, 5, 2, 6, 1, 4, 3];
        let mut first = Replacer::new(Algorithm::LFU, 3, &refs);
        let mut second = Replacer::new(Algorithm::LFU, 3, &refs);
        assert_eq!(run(&mut first, &refs), run(&mut second, &refs));
    }

    #[test]
    fn test_optimal_evicts_farthest_future_reference() {
        let refs = [1, 2, 3, 4, 1, 2, 3];
        let mut replacer = Replacer::new(Algorithm::Optimal, 3, &refs);
        replacer.access(1);
        replacer.access(2);
        replacer.access(3);
        // Upcoming: 1, 2, 3 - page 3 is referenced last
        assert_eq!(replacer.access(4), (Some(3), true));
    }

    #[test]
    fn test_optimal_prefers_page_never_referenced_again() {
        let refs = [1, 2, 3, 4, 1, 1, 1, 3];
        let mut replacer = Replacer::new(Algorithm::Optimal, 3, &refs);
        replacer.access(1);
        replacer.access(2);
        replacer.access(3);
        // Page 1 has a future use but page 2 never appears again
        assert_eq!(replacer.access(4), (Some(2), true));
    }

    #[test]
    fn test_optimal_can_evict_page_zero() {
        let refs = [0, 1, 2, 1, 0];
        let mut replacer = Replacer::new(Algorithm::Optimal, 2, &refs);
        replacer.access(0);
        replacer.access(1);
        // Next uses: 1 at distance 0, 0 at distance 1 - page 0 is farthest
        assert_eq!(replacer.access(2), (Some(0), true));
    }

    #[test]
    fn test_optimal_distance_tie_keeps_first_resident() {
        // Neither resident page appears again; the first inserted one goes
        let refs = [5, 6, 7];
        let mut replacer = Replacer::new(Algorithm::Optimal, 2, &refs);
        replacer.access(5);
        replacer.access(6);
        assert_eq!(replacer.access(7), (Some(5), true));
    }
}
