//! The memory manager owns the TLB, page table, swap space, frame array and
//! replacement policy, and drives them through one per-reference operation.

use log::{debug, trace};
use serde::Serialize;

use crate::error::SimError;
use crate::page_table::PageTable;
use crate::replacement::{Algorithm, Replacer};
use crate::swap::SwapSpace;
use crate::tlb::Tlb;
use crate::{Frame, Page};

/// Outcome of a single page access, consumed by display surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessResult {
    pub page: Page,
    pub tlb_hit: bool,
    pub page_fault: bool,
    /// Page evicted to make room, when the fault required one.
    pub victim: Option<Page>,
    /// Frame the page occupies after the access.
    pub frame: Frame,
}

/// Aggregate counters and derived rates for a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub page_faults: u64,
    pub total_accesses: u64,
    /// Fault percentage over all accesses; 0 when nothing was accessed.
    pub fault_rate: f64,
    pub tlb_hits: u64,
    pub tlb_misses: u64,
    /// Hit percentage over all TLB lookups; 0 when none happened.
    pub tlb_hit_ratio: f64,
    pub swap_ins: u64,
    pub swap_outs: u64,
}

/// Single-owner simulation core. Reconfiguration means constructing a new
/// manager, not mutating a shared one.
pub struct MemoryManager {
    num_frames: usize,
    algorithm: Algorithm,
    frames: Vec<Option<Page>>,
    page_table: PageTable,
    tlb: Tlb,
    swap: SwapSpace,
    replacer: Option<Replacer>,
    page_faults: u64,
    total_accesses: u64,
}

impl MemoryManager {
    /// Create a manager with `num_frames` physical frames, a TLB holding
    /// `tlb_size` entries, and the given replacement algorithm.
    pub fn new(
        num_frames: usize,
        tlb_size: usize,
        algorithm: Algorithm,
    ) -> Result<Self, SimError> {
        if num_frames == 0 || tlb_size == 0 {
            return Err(SimError::Config {
                num_frames,
                tlb_size,
            });
        }
        Ok(MemoryManager {
            num_frames,
            algorithm,
            frames: vec![None; num_frames],
            page_table: PageTable::new(),
            tlb: Tlb::new(tlb_size),
            swap: SwapSpace::new(),
            replacer: None,
            page_faults: 0,
            total_accesses: 0,
        })
    }

    /// Install the replacement policy for the coming run.
    ///
    /// Must be called before the first access. The full reference sequence
    /// is what the Optimal policy plans against; the other policies ignore
    /// it.
    pub fn initialize_policy(&mut self, reference_sequence: &[Page]) {
        self.replacer = Some(Replacer::new(
            self.algorithm,
            self.num_frames,
            reference_sequence,
        ));
    }

    /// Resolve one page reference and mutate every owned component
    /// accordingly.
    ///
    /// Resolution order: TLB, then page table, then fault handling through
    /// the replacement policy.
    pub fn access_page(&mut self, page: Page) -> Result<AccessResult, SimError> {
        if self.replacer.is_none() {
            return Err(SimError::PolicyNotInitialized);
        }
        self.total_accesses += 1;

        if let Some(frame) = self.tlb.lookup(page) {
            return Ok(AccessResult {
                page,
                tlb_hit: true,
                page_fault: false,
                victim: None,
                frame,
            });
        }

        if let Some(frame) = self.page_table.frame_of(page) {
            trace!("page table hit: page {page} -> frame {frame}");
            self.tlb.insert(page, frame);
            return Ok(AccessResult {
                page,
                tlb_hit: false,
                page_fault: false,
                victim: None,
                frame,
            });
        }

        self.page_faults += 1;
        let (victim, _) = match self.replacer.as_mut() {
            Some(replacer) => replacer.access(page),
            // ruled out above
            None => (None, true),
        };

        let frame = match victim {
            Some(victim_page) => self.evict_and_assign(victim_page, page),
            None => self.assign_free_frame(page),
        };
        self.swap.swap_in(page);
        self.tlb.insert(page, frame);
        debug!("page fault: page {page} -> frame {frame}, victim {victim:?}");

        Ok(AccessResult {
            page,
            tlb_hit: false,
            page_fault: true,
            victim,
            frame,
        })
    }

    /// Hand the victim's frame over to `page`.
    fn evict_and_assign(&mut self, victim: Page, page: Page) -> Frame {
        // The policy only names pages it still tracks as resident, so the
        // victim always occupies a frame.
        let frame = self
            .frames
            .iter()
            .position(|slot| *slot == Some(victim))
            .unwrap_or(0);
        self.swap.swap_out(victim);
        self.frames[frame] = Some(page);
        self.page_table.remove(victim);
        self.page_table.insert(page, frame);
        self.tlb.remove(victim);
        frame
    }

    /// Place `page` in the lowest-indexed empty frame.
    fn assign_free_frame(&mut self, page: Page) -> Frame {
        let frame = self
            .frames
            .iter()
            .position(|slot| slot.is_none())
            .unwrap_or(0);
        self.frames[frame] = Some(page);
        self.page_table.insert(page, frame);
        frame
    }

    /// Throw away all run state. A new policy must be installed before the
    /// next access.
    pub fn reset(&mut self) {
        self.frames = vec![None; self.num_frames];
        self.page_table = PageTable::new();
        self.tlb.clear();
        self.swap.clear();
        self.replacer = None;
        self.page_faults = 0;
        self.total_accesses = 0;
    }

    /// Current counters with derived percentages.
    pub fn metrics(&self) -> Metrics {
        let tlb_hits = self.tlb.hits();
        let tlb_misses = self.tlb.misses();
        let lookups = tlb_hits + tlb_misses;
        Metrics {
            page_faults: self.page_faults,
            total_accesses: self.total_accesses,
            fault_rate: if self.total_accesses > 0 {
                self.page_faults as f64 / self.total_accesses as f64 * 100.0
            } else {
                0.0
            },
            tlb_hits,
            tlb_misses,
            tlb_hit_ratio: if lookups > 0 {
                tlb_hits as f64 / lookups as f64 * 100.0
            } else {
                0.0
            },
            swap_ins: self.swap.swap_ins(),
            swap_outs: self.swap.swap_outs(),
        }
    }

    /// Physical memory contents by frame index.
    pub fn frames(&self) -> &[Option<Page>] {
        &self.frames
    }

    /// Valid page-table mappings, in ascending page order.
    pub fn mappings(&self) -> Vec<(Page, Frame)> {
        self.page_table.valid_mappings()
    }

    /// TLB entries from least- to most-recently used.
    pub fn tlb_entries(&self) -> Vec<(Page, Frame)> {
        self.tlb.entries()
    }

    /// Pages recorded in the backing store, in ascending order.
    pub fn swapped_pages(&self) -> Vec<Page> {
        self.swap.resident_pages()
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    pub fn tlb_size(&self) -> usize {
        self.tlb.capacity()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}
